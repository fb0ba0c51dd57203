//! SQLite-backed session storage.
//!
//! The record is stored as one JSON column; `status` is duplicated into its own
//! column so the sweeper can find running sessions without decoding every row.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use donjon_domain::{SessionId, SessionRecord, SessionStatus};

use crate::infrastructure::ports::{ClockPort, RepoError, SessionReader, SessionRepo};

pub struct SqliteSessionRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteSessionRepo {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("sessions", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS game_sessions (
                id TEXT PRIMARY KEY NOT NULL,
                code TEXT NOT NULL,
                status TEXT NOT NULL,
                record_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("sessions", e))?;

        Ok(Self { pool, clock })
    }

    async fn load(&self, id: SessionId) -> Result<Option<SessionRecord>, RepoError> {
        let row = sqlx::query("SELECT record_json FROM game_sessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("sessions.get", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("record_json");
                let session = serde_json::from_str(&json).map_err(RepoError::serialization)?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SessionReader for SqliteSessionRepo {
    async fn snapshot(&self, id: SessionId) -> Result<Option<SessionRecord>, RepoError> {
        self.load(id).await
    }
}

#[async_trait]
impl SessionRepo for SqliteSessionRepo {
    async fn get(&self, id: SessionId) -> Result<Option<SessionRecord>, RepoError> {
        self.load(id).await
    }

    async fn save(&self, session: &SessionRecord) -> Result<(), RepoError> {
        let json = serde_json::to_string(session).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO game_sessions (id, code, status, record_json, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                code = excluded.code,
                status = excluded.status,
                record_json = excluded.record_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(session.id.to_string())
        .bind(&session.code)
        .bind(session.status.as_str())
        .bind(json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("sessions.save", e))?;

        Ok(())
    }

    async fn list_in_progress(&self) -> Result<Vec<SessionId>, RepoError> {
        let rows = sqlx::query("SELECT id FROM game_sessions WHERE status = ? ORDER BY id")
            .bind(SessionStatus::InProgress.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("sessions.list_in_progress", e))?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                uuid::Uuid::parse_str(&id)
                    .map(SessionId::from)
                    .map_err(|e| RepoError::serialization(format!("bad session id {id}: {e}")))
            })
            .collect()
    }
}
