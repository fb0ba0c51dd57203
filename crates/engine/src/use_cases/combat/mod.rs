//! Combat use cases: opening a fight, previewing and confirming rolls, and
//! releasing rounds that would otherwise wait forever.

use std::sync::Arc;

mod confirm;
mod preview;
mod rounds;
mod start;

pub use confirm::{ConfirmRoll, RollConfirmation};
pub use preview::{PreviewRoll, RollPreview};
pub use rounds::{ForceAdvanceRound, ReleaseStalledRounds};
pub use start::{CombatOpened, CombatRequest, StartCombat};

/// Container for combat use cases.
pub struct CombatUseCases {
    pub start: Arc<StartCombat>,
    pub preview: Arc<PreviewRoll>,
    pub confirm: Arc<ConfirmRoll>,
    pub force_advance: Arc<ForceAdvanceRound>,
    pub release_stalled: Arc<ReleaseStalledRounds>,
}

impl CombatUseCases {
    pub fn new(
        start: Arc<StartCombat>,
        preview: Arc<PreviewRoll>,
        confirm: Arc<ConfirmRoll>,
        force_advance: Arc<ForceAdvanceRound>,
        release_stalled: Arc<ReleaseStalledRounds>,
    ) -> Self {
        Self {
            start,
            preview,
            confirm,
            force_advance,
            release_stalled,
        }
    }
}
