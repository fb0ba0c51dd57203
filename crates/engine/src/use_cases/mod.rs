//! Use cases - one per player action.
//!
//! Every action that changes a session goes through [`SessionGate`]: lock,
//! load, mutate, save. Failures return an [`ActionError`] before anything is
//! written.

pub mod combat;
pub mod event;
pub mod inventory;
pub mod session;

mod error;
mod gate;

pub use combat::CombatUseCases;
pub use error::ActionError;
pub use event::EventUseCases;
pub use gate::{Committed, OpenSession, SessionGate};
pub use inventory::InventoryUseCases;
pub use session::SessionUseCases;

#[cfg(test)]
pub(crate) mod test_support;
