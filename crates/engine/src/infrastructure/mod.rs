//! Infrastructure: port definitions and their adapters.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod ports;
pub mod session_store;
pub mod sqlite_sessions;
