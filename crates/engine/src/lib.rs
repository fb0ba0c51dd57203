//! Donjon Engine library.
//!
//! Authoritative session server for party dungeon crawls: clients send their
//! intents over a WebSocket, the engine resolves them against stored session
//! state and broadcasts the outcome to the room.
//!
//! ## Structure
//!
//! - `use_cases/` - One orchestration per player action
//! - `stores/` - In-process runtime state (per-session locks)
//! - `infrastructure/` - Ports and their adapters (session stores, catalog, clock, config)
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
