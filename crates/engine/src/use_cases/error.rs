//! Error type shared by every session-scoped use case.

use donjon_domain::{ConsumableError, DomainError, InventoryFull, SessionId};

use crate::infrastructure::ports::RepoError;

/// Why a player action was refused. Nothing is saved or broadcast when a use
/// case returns one of these.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Malformed input (bad requirements, unknown stat)
    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Only the host can {0}")]
    NotHost(&'static str),

    #[error("Inventory full ({capacity} slots)")]
    InventoryFull { capacity: usize },

    /// Catalog content that breaks an invariant
    #[error("Content error: {0}")]
    Content(String),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl ActionError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

impl From<DomainError> for ActionError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(message) => Self::Invalid(message),
            DomainError::NotFound { entity_type, id } => Self::NotFound {
                entity: entity_type,
                id,
            },
            DomainError::InvalidState(message) => Self::InvalidState(message),
            DomainError::InvariantViolation(message) => Self::Content(message),
        }
    }
}

impl From<ConsumableError> for ActionError {
    fn from(err: ConsumableError) -> Self {
        match err {
            ConsumableError::NotInInventory(item_id) => Self::not_found("inventory item", item_id),
            ConsumableError::Depleted(_) => Self::InvalidState(err.to_string()),
        }
    }
}

impl From<InventoryFull> for ActionError {
    fn from(err: InventoryFull) -> Self {
        Self::InventoryFull {
            capacity: err.capacity,
        }
    }
}
