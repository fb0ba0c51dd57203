use std::sync::Arc;

use donjon_domain::{
    BarrierStatus, DiceRequirement, DiceRoll, PlayerId, RollResult, SessionId,
};

use crate::infrastructure::ports::{ClockPort, ContentCatalog};
use crate::use_cases::inventory::armor_for;
use crate::use_cases::{ActionError, Committed, SessionGate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollConfirmation {
    pub player_id: PlayerId,
    pub result: RollResult,
    pub remaining_requirements: Vec<DiceRequirement>,
    /// Round number after the barrier was evaluated
    pub current_round: u32,
    pub barrier: BarrierStatus,
    /// Player HP after retaliation, when the roll was hit
    pub hp_after_damage: Option<u32>,
    pub player_died: bool,
}

/// Authoritatively resolve a roll and fold it into the combat.
///
/// The client only says which die it rolled. Forced stats, the reroll
/// potion, requirements, damage and armor are all taken from stored state.
pub struct ConfirmRoll {
    gate: Arc<SessionGate>,
    catalog: Arc<dyn ContentCatalog>,
    clock: Arc<dyn ClockPort>,
}

impl ConfirmRoll {
    pub fn new(
        gate: Arc<SessionGate>,
        catalog: Arc<dyn ContentCatalog>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            gate,
            catalog,
            clock,
        }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
        player_id: &PlayerId,
        roll: DiceRoll,
    ) -> Result<Committed<RollConfirmation>, ActionError> {
        let mut open = self.gate.open(session_id).await?;
        let session = &mut open.session;
        session.ensure_member(player_id)?;
        if session.active_combat().is_none() {
            return Err(ActionError::invalid_state("no active combat"));
        }

        let roster = session.player_ids.clone();
        let state = session.player_state_mut(player_id)?;
        if roll.used_reroll {
            state.spend_reroll()?;
        }
        let roll = state
            .take_forced_roll()
            .map_or(roll, |stat| roll.with_stat(stat));

        let Some(combat) = session.game_state.combat_state.as_mut() else {
            return Err(ActionError::invalid_state("no active combat"));
        };
        let confirmed = combat.confirm(player_id, &roll, &roster, self.clock.now())?;
        let remaining_requirements = combat.remaining_requirements.clone();
        let current_round = combat.current_round;

        let mut hp_after_damage = None;
        let mut player_died = false;
        if confirmed.result.damage_taken > 0 {
            let state = session.player_state_mut(player_id)?;
            let armor = armor_for(self.catalog.as_ref(), state);
            let outcome = state.apply_damage(confirmed.result.damage_taken, armor);
            hp_after_damage = Some(state.current_hp);
            player_died = outcome.is_killed();
        }
        if player_died {
            session.finish(false);
            tracing::info!(
                session_id = %session_id,
                player_id = %player_id,
                "Player died in combat, game lost"
            );
        }

        tracing::debug!(
            session_id = %session_id,
            player_id = %player_id,
            stat = %roll.stat,
            round = confirmed.round,
            victory = confirmed.result.is_victory,
            damage = confirmed.result.damage_taken,
            "Roll confirmed"
        );

        let confirmation = RollConfirmation {
            player_id: player_id.clone(),
            result: confirmed.result,
            remaining_requirements,
            current_round,
            barrier: confirmed.barrier,
            hp_after_damage,
            player_died,
        };
        self.gate.commit(open, confirmation).await
    }
}
