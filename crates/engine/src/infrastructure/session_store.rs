//! In-memory session store.
//!
//! Used when no `SESSION_DB` is configured and throughout the tests. Sessions are
//! created by the lobby, so seeding goes through `insert`.

use async_trait::async_trait;
use dashmap::DashMap;

use donjon_domain::{SessionId, SessionRecord, SessionStatus};

use crate::infrastructure::ports::{RepoError, SessionReader, SessionRepo};

#[derive(Default)]
pub struct InMemorySessionRepo {
    sessions: DashMap<SessionId, SessionRecord>,
}

impl InMemorySessionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: SessionRecord) {
        self.sessions.insert(session.id, session);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionReader for InMemorySessionRepo {
    async fn snapshot(&self, id: SessionId) -> Result<Option<SessionRecord>, RepoError> {
        Ok(self.sessions.get(&id).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl SessionRepo for InMemorySessionRepo {
    async fn get(&self, id: SessionId) -> Result<Option<SessionRecord>, RepoError> {
        Ok(self.sessions.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, session: &SessionRecord) -> Result<(), RepoError> {
        self.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn list_in_progress(&self) -> Result<Vec<SessionId>, RepoError> {
        let mut ids: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|entry| entry.status == SessionStatus::InProgress)
            .map(|entry| *entry.key())
            .collect();
        ids.sort();
        Ok(ids)
    }
}
