//! Small wire enums carried inside messages

use serde::{Deserialize, Serialize};

/// Why a game ended, when the server knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEndReason {
    PlayerDeath,
    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

/// Why an item could not be added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemAddFailure {
    InventoryFull,
    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}
