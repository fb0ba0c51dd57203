use std::sync::Arc;

use donjon_domain::{CharacterId, PlayerId, SessionId};

use crate::use_cases::{ActionError, Committed, SessionGate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSelection {
    pub player_id: PlayerId,
    pub character_id: CharacterId,
    pub current_hp: u32,
    pub max_hp: u32,
}

/// Pick or change a character. A new pick starts at full HP; changing keeps
/// the inventory and revives a dead player.
pub struct SelectCharacter {
    gate: Arc<SessionGate>,
}

impl SelectCharacter {
    pub fn new(gate: Arc<SessionGate>) -> Self {
        Self { gate }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
        player_id: &PlayerId,
        character_id: CharacterId,
        max_hp: u32,
    ) -> Result<Committed<CharacterSelection>, ActionError> {
        if max_hp == 0 {
            return Err(ActionError::Invalid("max_hp must be positive".into()));
        }

        let mut open = self.gate.open(session_id).await?;
        if open.session.status.is_finished() {
            return Err(ActionError::invalid_state(format!(
                "session is already {}",
                open.session.status.as_str()
            )));
        }

        let state = open
            .session
            .select_character(player_id, character_id, max_hp)?;
        let selection = CharacterSelection {
            player_id: player_id.clone(),
            character_id: state.character_id.clone(),
            current_hp: state.current_hp,
            max_hp: state.max_hp,
        };

        tracing::debug!(
            session_id = %session_id,
            player_id = %player_id,
            character_id = %selection.character_id,
            "Character selected"
        );

        self.gate.commit(open, selection).await
    }
}
