use std::sync::Arc;

use donjon_domain::{DiceRoll, PlayerId, RollResult, SessionId};

use crate::infrastructure::ports::SessionReader;
use crate::use_cases::ActionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollPreview {
    /// The roll as it would be confirmed (forced stat applied)
    pub roll: DiceRoll,
    /// `None` outside of combat
    pub result: Option<RollResult>,
}

/// Compute what a roll would do without committing it.
///
/// Only a reader is available here, so a preview can never write.
pub struct PreviewRoll {
    sessions: Arc<dyn SessionReader>,
}

impl PreviewRoll {
    pub fn new(sessions: Arc<dyn SessionReader>) -> Self {
        Self { sessions }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
        player_id: &PlayerId,
        roll: DiceRoll,
    ) -> Result<RollPreview, ActionError> {
        let session = self
            .sessions
            .snapshot(session_id)
            .await?
            .ok_or(ActionError::SessionNotFound(session_id))?;
        session.ensure_member(player_id)?;

        let Some(combat) = session.active_combat() else {
            return Ok(RollPreview { roll, result: None });
        };

        let state = session.player_state(player_id)?;
        let roll = state
            .forced_next_roll
            .map_or(roll, |stat| roll.with_stat(stat));

        Ok(RollPreview {
            roll,
            result: Some(combat.preview(&roll).result),
        })
    }
}
