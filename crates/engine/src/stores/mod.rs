//! In-memory runtime state that never reaches the database.
//!
//! - `SessionLocks` - one async mutex per session, serializing its mutations

pub mod session_locks;

pub use session_locks::{SessionGuard, SessionLocks};
