use std::sync::Arc;

use donjon_domain::{PlayerId, SessionId, SessionRecord};

use crate::use_cases::{ActionError, Committed, SessionGate};

/// Join a session as one of its roster players.
///
/// Nothing is written. The snapshot is taken under the session lock and the
/// lock travels with it, so the joiner's `SessionState` and the room's
/// `PlayerJoined` are queued before any later action is applied.
pub struct JoinSession {
    gate: Arc<SessionGate>,
}

impl JoinSession {
    pub fn new(gate: Arc<SessionGate>) -> Self {
        Self { gate }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
        player_id: &PlayerId,
    ) -> Result<Committed<SessionRecord>, ActionError> {
        let open = self.gate.open(session_id).await?;
        open.session.ensure_member(player_id)?;

        let snapshot = open.session.clone();
        Ok(SessionGate::hold(open, snapshot))
    }
}
