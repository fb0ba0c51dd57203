//! Aggregates - state that changes over a session and guards its own invariants

mod combat;
mod player_state;
mod session;

pub use combat::{resolve_roll, CombatModifiers, CombatSetup, CombatStart, CombatState};
pub use player_state::{InventoryItem, PlayerState};
pub use session::{SessionGameState, SessionRecord, SessionStatus, DEFAULT_MAX_PLAYERS};
