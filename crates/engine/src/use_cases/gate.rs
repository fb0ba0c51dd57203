//! Locked read-modify-write access to a session.
//!
//! `open` takes the session's lock and loads it, the use case mutates the
//! loaded copy, and `commit` saves it. The returned [`Committed`] keeps the
//! lock until the caller drops it, so the events of one action are queued to
//! every connection before the next action on that session can start.

use std::ops::Deref;
use std::sync::Arc;

use donjon_domain::{SessionId, SessionRecord};

use crate::infrastructure::ports::SessionRepo;
use crate::stores::{SessionGuard, SessionLocks};

use super::ActionError;

pub struct SessionGate {
    sessions: Arc<dyn SessionRepo>,
    locks: Arc<SessionLocks>,
}

/// A session loaded under its lock.
pub struct OpenSession {
    guard: SessionGuard,
    pub session: SessionRecord,
}

impl SessionGate {
    pub fn new(sessions: Arc<dyn SessionRepo>, locks: Arc<SessionLocks>) -> Self {
        Self { sessions, locks }
    }

    pub async fn open(&self, session_id: SessionId) -> Result<OpenSession, ActionError> {
        let guard = self.locks.acquire(session_id).await;
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(ActionError::SessionNotFound(session_id))?;
        Ok(OpenSession { guard, session })
    }

    /// Persist the mutated session and keep the lock with the outcome.
    pub async fn commit<T>(&self, open: OpenSession, outcome: T) -> Result<Committed<T>, ActionError> {
        self.sessions.save(&open.session).await?;
        Ok(Committed {
            _guard: open.guard,
            outcome,
        })
    }

    /// Keep the lock with the outcome without writing anything.
    pub fn hold<T>(open: OpenSession, outcome: T) -> Committed<T> {
        Committed {
            _guard: open.guard,
            outcome,
        }
    }
}

/// Outcome of a saved action, still holding the session lock.
pub struct Committed<T> {
    _guard: SessionGuard,
    outcome: T,
}

impl<T> Committed<T> {
    pub fn outcome(&self) -> &T {
        &self.outcome
    }

    /// Release the lock and keep the outcome.
    pub fn into_inner(self) -> T {
        self.outcome
    }
}

impl<T> Deref for Committed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.outcome
    }
}
