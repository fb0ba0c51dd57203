//! Narrative event use cases.

use std::sync::Arc;

mod choice;

pub use choice::{ChoiceOutcome, ResolveChoice};

/// Container for event use cases.
pub struct EventUseCases {
    pub resolve_choice: Arc<ResolveChoice>,
}

impl EventUseCases {
    pub fn new(resolve_choice: Arc<ResolveChoice>) -> Self {
        Self { resolve_choice }
    }
}
