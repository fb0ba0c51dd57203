//! HTTP routes.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use donjon_domain::{AdventureId, RandomizedAdventure, Seed, SessionId, SessionRecord};

use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::{session::randomize_from_catalog, ActionError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/sessions/{id}", get(get_session))
        .route("/api/adventures/{id}/randomized", get(randomized_adventure))
}

async fn health() -> &'static str {
    "OK"
}

async fn get_session(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionRecord>, ApiError> {
    let session = app
        .repositories
        .session_reader
        .snapshot(SessionId::from_uuid(id))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(session))
}

#[derive(Debug, Deserialize)]
struct SeedQuery {
    seed: u32,
}

/// Randomizer output, so clients can check their own shuffle against the engine.
#[derive(Debug, Serialize, Deserialize)]
pub struct RandomizedAdventureResponse {
    pub adventure_id: AdventureId,
    pub seed: Seed,
    #[serde(flatten)]
    pub randomized: RandomizedAdventure,
}

async fn randomized_adventure(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    Query(query): Query<SeedQuery>,
) -> Result<Json<RandomizedAdventureResponse>, ApiError> {
    let adventure_id = AdventureId::from(id);
    let seed = Seed::new(query.seed);
    let randomized = randomize_from_catalog(app.repositories.catalog.as_ref(), &adventure_id, seed)?;

    Ok(Json(RandomizedAdventureResponse {
        adventure_id,
        seed,
        randomized,
    }))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => {
                (axum::http::StatusCode::NOT_FOUND, "Not found").into_response()
            }
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "HTTP request failed");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                )
                    .into_response()
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<ActionError> for ApiError {
    fn from(e: ActionError) -> Self {
        match e {
            ActionError::SessionNotFound(_) | ActionError::NotFound { .. } => ApiError::NotFound,
            ActionError::Invalid(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
