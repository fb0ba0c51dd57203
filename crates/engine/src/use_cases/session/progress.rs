use std::sync::Arc;

use donjon_domain::{PlayerId, SessionId};

use crate::use_cases::{ActionError, Committed, SessionGate};

/// Move the party to the next event.
pub struct AdvanceEvent {
    gate: Arc<SessionGate>,
}

impl AdvanceEvent {
    pub fn new(gate: Arc<SessionGate>) -> Self {
        Self { gate }
    }

    /// Returns the new event index.
    pub async fn execute(
        &self,
        session_id: SessionId,
        player_id: &PlayerId,
    ) -> Result<Committed<u32>, ActionError> {
        let mut open = self.gate.open(session_id).await?;
        open.session.ensure_member(player_id)?;
        open.session.ensure_in_progress()?;

        let index = open.session.advance_event();
        tracing::debug!(session_id = %session_id, event_index = index, "Advanced to next event");

        self.gate.commit(open, index).await
    }
}

/// End the game with a victory or a defeat.
pub struct EndGame {
    gate: Arc<SessionGate>,
}

impl EndGame {
    pub fn new(gate: Arc<SessionGate>) -> Self {
        Self { gate }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
        player_id: &PlayerId,
        victory: bool,
    ) -> Result<Committed<bool>, ActionError> {
        let mut open = self.gate.open(session_id).await?;
        open.session.ensure_member(player_id)?;
        if open.session.status.is_finished() {
            return Err(ActionError::invalid_state(format!(
                "session is already {}",
                open.session.status.as_str()
            )));
        }

        open.session.finish(victory);
        tracing::info!(session_id = %session_id, victory, "Game over");

        self.gate.commit(open, victory).await
    }
}
