//! Player-state domain events

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::ItemId;
use crate::value_objects::Stat;

/// Outcome of applying damage to a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Raw damage was zero, nothing changed
    Unharmed,
    /// Player took damage but survived
    Wounded { applied: u32, remaining_hp: u32 },
    /// This damage brought the player to 0 HP
    Killed { applied: u32 },
    /// Player was already at 0 HP
    AlreadyDead,
}

impl DamageOutcome {
    /// HP actually removed
    pub fn applied(&self) -> u32 {
        match self {
            Self::Wounded { applied, .. } | Self::Killed { applied } => *applied,
            Self::Unharmed | Self::AlreadyDead => 0,
        }
    }

    pub fn is_killed(&self) -> bool {
        matches!(self, Self::Killed { .. })
    }
}

/// What a consumable did. Announced to the room as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableUse {
    pub item_id: ItemId,
    /// HP actually restored, when the item heals
    pub healing: Option<u32>,
    pub forced_stat: Option<Stat>,
    pub allows_reroll: bool,
    /// Forcing the next roll costs the player their turn
    pub consumes_turn: bool,
    /// No uses left; the caller removes the item
    pub depleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsumableError {
    #[error("Item {0} is not in the inventory")]
    NotInInventory(ItemId),
    #[error("Item {0} has no uses left")]
    Depleted(ItemId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Inventory full ({capacity} slots)")]
pub struct InventoryFull {
    pub capacity: usize,
}
