use std::sync::Arc;

use donjon_domain::{PlayerId, SessionId};

use crate::infrastructure::ports::ContentCatalog;
use crate::use_cases::inventory::armor_for;
use crate::use_cases::{ActionError, Committed, SessionGate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOutcome {
    pub player_id: PlayerId,
    /// New HP when the choice hurt or healed
    pub hp: Option<u32>,
    pub player_died: bool,
}

/// Apply the HP consequence of an event choice.
///
/// Positive damage goes through armor, negative damage heals. The choice
/// itself is narrative and only relayed.
pub struct ResolveChoice {
    gate: Arc<SessionGate>,
    catalog: Arc<dyn ContentCatalog>,
}

impl ResolveChoice {
    pub fn new(gate: Arc<SessionGate>, catalog: Arc<dyn ContentCatalog>) -> Self {
        Self { gate, catalog }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
        player_id: &PlayerId,
        damage: Option<i32>,
    ) -> Result<Committed<ChoiceOutcome>, ActionError> {
        let mut open = self.gate.open(session_id).await?;
        open.session.ensure_member(player_id)?;

        let damage = damage.unwrap_or(0);
        if damage == 0 {
            let outcome = ChoiceOutcome {
                player_id: player_id.clone(),
                hp: None,
                player_died: false,
            };
            return Ok(SessionGate::hold(open, outcome));
        }

        open.session.ensure_in_progress()?;
        let state = open.session.player_state_mut(player_id)?;
        let player_died = if damage > 0 {
            let armor = armor_for(self.catalog.as_ref(), state);
            state.apply_damage(damage.unsigned_abs(), armor).is_killed()
        } else {
            state.heal(damage.unsigned_abs());
            false
        };
        let hp = state.current_hp;

        if player_died {
            open.session.finish(false);
            tracing::info!(
                session_id = %session_id,
                player_id = %player_id,
                "Player died from an event, game lost"
            );
        }

        let outcome = ChoiceOutcome {
            player_id: player_id.clone(),
            hp: Some(hp),
            player_died,
        };
        self.gate.commit(open, outcome).await
    }
}
