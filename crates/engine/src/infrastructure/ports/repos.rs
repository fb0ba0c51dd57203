//! Repository ports.

use async_trait::async_trait;

use donjon_domain::{
    AdventureDefinition, AdventureId, EnemyDefinition, EnemyId, EventDefinition, ItemDefinition,
    ItemId, SessionId, SessionRecord,
};

use super::RepoError;

// =============================================================================
// Session persistence
// =============================================================================

/// Read-only view of the session store.
///
/// Handlers that must never write (roll previews, snapshots) only get this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionReader: Send + Sync {
    async fn snapshot(&self, id: SessionId) -> Result<Option<SessionRecord>, RepoError>;
}

/// Read-modify-write access to session records.
///
/// Callers hold the session's lock from `get` through `save`; the store itself
/// does no locking beyond keeping single operations atomic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepo: Send + Sync {
    async fn get(&self, id: SessionId) -> Result<Option<SessionRecord>, RepoError>;
    async fn save(&self, session: &SessionRecord) -> Result<(), RepoError>;
    /// Ids of sessions whose status is `in_progress`
    async fn list_in_progress(&self) -> Result<Vec<SessionId>, RepoError>;
}

// =============================================================================
// Static content
// =============================================================================

/// Immutable game content, looked up by id.
#[cfg_attr(test, mockall::automock)]
pub trait ContentCatalog: Send + Sync {
    fn adventure(&self, id: &AdventureId) -> Option<AdventureDefinition>;
    /// Events of a pool, in catalog order
    fn event_pool(&self, events_key: &str) -> Vec<EventDefinition>;
    fn enemy(&self, id: &EnemyId) -> Option<EnemyDefinition>;
    fn item(&self, id: &ItemId) -> Option<ItemDefinition>;
    /// Every item, sorted by id
    fn items(&self) -> Vec<ItemDefinition>;
}
