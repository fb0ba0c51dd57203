//! Donjon Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use donjon_engine::api::{
    self,
    websocket::{round_sweeper, ws_handler, WsState},
    ConnectionManager,
};
use donjon_engine::app::{App, GameRules};
use donjon_engine::infrastructure::{
    catalog::StaticCatalog,
    clock::SystemClock,
    config::EngineConfig,
    ports::{ClockPort, ContentCatalog},
    session_store::InMemorySessionRepo,
    sqlite_sessions::SqliteSessionRepo,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "donjon_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Donjon Engine");

    let config = EngineConfig::from_env();
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    // Content is validated here; a broken catalog stops the engine
    let catalog: Arc<dyn ContentCatalog> = match &config.content_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading content catalog");
            Arc::new(StaticCatalog::load(path).await?)
        }
        None => Arc::new(StaticCatalog::bundled()?),
    };

    let rules = GameRules::from_config(&config);
    let app = match &config.session_db {
        Some(db_path) => {
            tracing::info!(path = %db_path, "Using SQLite session store");
            let store = Arc::new(SqliteSessionRepo::new(db_path, clock.clone()).await?);
            App::new(store, catalog, clock, rules)
        }
        None => {
            tracing::warn!("SESSION_DB not set, sessions live in memory only");
            App::new(Arc::new(InMemorySessionRepo::new()), catalog, clock, rules)
        }
    };
    let app = Arc::new(app);

    let connections = Arc::new(ConnectionManager::new());
    let ws_state = Arc::new(WsState::new(app.clone(), connections));

    // Spawn the stalled-round sweeper
    match rules.round_timeout {
        Some(timeout) => {
            tracing::info!(
                timeout_secs = timeout.num_seconds(),
                interval_secs = config.round_sweep_interval.as_secs(),
                "Round sweeper enabled"
            );
            round_sweeper::spawn_round_sweeper(ws_state.clone(), config.round_sweep_interval);
        }
        None => tracing::info!("ROUND_TIMEOUT_SECS is 0, round sweeper disabled"),
    }

    let mut router = axum::Router::new()
        .merge(api::http::routes().with_state(app))
        .route("/ws", get(ws_handler).with_state(ws_state))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
