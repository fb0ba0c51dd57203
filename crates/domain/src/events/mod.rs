//! Domain events
//!
//! Return types of aggregate mutations. They describe what changed so the
//! orchestration layer can decide what to persist and announce.

mod combat_events;
mod player_events;

pub use combat_events::{BarrierStatus, ConfirmedRoll, RollResolution, RollResult, SkippedRound};
pub use player_events::{ConsumableError, ConsumableUse, DamageOutcome, InventoryFull};
