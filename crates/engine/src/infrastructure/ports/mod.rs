//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Session persistence (in-memory for tests, SQLite shared with the lobby)
//! - Static game content (bundled JSON or a file on disk)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;

pub use error::RepoError;
pub use repos::{ContentCatalog, SessionReader, SessionRepo};
pub use testing::ClockPort;

#[cfg(test)]
pub use repos::{MockContentCatalog, MockSessionReader, MockSessionRepo};
#[cfg(test)]
pub use testing::MockClockPort;
