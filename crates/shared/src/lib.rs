//! Donjon Protocol - Shared types for the engine and game clients
//!
//! - WebSocket message types (`ClientMessage`, `ServerMessage`)
//! - Error classification codes
//! - Small wire enums used inside messages
//!
//! # Design Principles
//!
//! 1. **No business logic** - Pure data types and serialization
//! 2. **Raw ids on the wire** - `uuid::Uuid` and `String`, never domain newtypes
//! 3. **Domain vocabulary is reused** - dice, requirements and state snapshots come
//!    straight from `donjon-domain` so both sides agree on field names

pub mod messages;
pub mod responses;
pub mod types;

pub use messages::{ClientMessage, ServerMessage};
pub use responses::ErrorCode;
pub use types::{GameEndReason, ItemAddFailure};
