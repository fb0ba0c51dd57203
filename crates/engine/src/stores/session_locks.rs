//! Per-session mutual exclusion.
//!
//! Every action that reads, mutates and saves a session holds that session's
//! guard from the read until its broadcasts are queued. Actions on different
//! sessions never contend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use donjon_domain::SessionId;

/// Proof that the caller owns its session until dropped.
pub type SessionGuard = OwnedMutexGuard<()>;

#[derive(Default)]
pub struct SessionLocks {
    locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the session's lock. Waiters are served in FIFO order.
    pub async fn acquire(&self, session_id: SessionId) -> SessionGuard {
        let lock = self
            .locks
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the lock of a finished session if nobody holds or awaits it.
    pub fn forget(&self, session_id: SessionId) -> bool {
        self.locks
            .remove_if(&session_id, |_, lock| Arc::strong_count(lock) == 1)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
