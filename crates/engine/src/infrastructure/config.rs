//! Engine configuration from environment variables.
//!
//! `.env.local` and `.env` at the repository root are loaded by `main` before
//! this runs, so both sources end up here.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_INVENTORY_CAPACITY: usize = 2;
pub const DEFAULT_ROUND_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_ROUND_SWEEP_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    /// SQLite file holding session records. `None` keeps sessions in memory.
    pub session_db: Option<String>,
    /// Catalog JSON on disk. `None` uses the bundled catalog.
    pub content_path: Option<PathBuf>,
    pub inventory_capacity: usize,
    /// `None` disables the stalled-round sweeper.
    pub round_timeout: Option<Duration>,
    pub round_sweep_interval: Duration,
    pub cors_allowed_origins: Option<String>,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let server_port = non_empty("SERVER_PORT")
            .or_else(|| non_empty("PORT"))
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let inventory_capacity = non_empty("INVENTORY_CAPACITY")
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_INVENTORY_CAPACITY);

        let round_timeout_secs: u64 = non_empty("ROUND_TIMEOUT_SECS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_ROUND_TIMEOUT_SECS);

        let sweep_secs: u64 = non_empty("ROUND_SWEEP_INTERVAL_SECS")
            .and_then(|value| value.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_ROUND_SWEEP_INTERVAL_SECS);

        Self {
            server_host: non_empty("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            server_port,
            session_db: non_empty("SESSION_DB"),
            content_path: non_empty("CONTENT_PATH").map(PathBuf::from),
            inventory_capacity,
            round_timeout: (round_timeout_secs > 0).then(|| Duration::from_secs(round_timeout_secs)),
            round_sweep_interval: Duration::from_secs(sweep_secs),
            cors_allowed_origins: non_empty("CORS_ALLOWED_ORIGINS"),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
