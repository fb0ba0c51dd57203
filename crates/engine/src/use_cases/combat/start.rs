use std::sync::Arc;

use donjon_domain::{
    derive_seed, CombatModifiers, CombatSetup, CombatState, DiceRequirement, EnemyId, PlayerId,
    SeedPurpose, SessionId, Stat,
};

use crate::infrastructure::ports::{ClockPort, ContentCatalog};
use crate::use_cases::{ActionError, Committed, SessionGate};

/// What the client asked for. Everything but the enemy falls back to the
/// catalog or the session.
#[derive(Debug, Clone)]
pub struct CombatRequest {
    pub enemy_id: EnemyId,
    pub enemy_damage: Option<u32>,
    pub player_count: Option<u32>,
    pub base_requirements: Option<Vec<DiceRequirement>>,
    pub modifiers: CombatModifiers,
}

impl CombatRequest {
    pub fn for_enemy(enemy_id: EnemyId) -> Self {
        Self {
            enemy_id,
            enemy_damage: None,
            player_count: None,
            base_requirements: None,
            modifiers: CombatModifiers::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatOpened {
    pub enemy_id: EnemyId,
    pub enemy_damage: u32,
    pub scaled_requirements: Vec<Stat>,
    pub remaining_requirements: Vec<DiceRequirement>,
    pub current_round: u32,
}

/// Open a combat scaled to the party.
///
/// The encounter seed comes from the session, the enemy and the current event,
/// so every replica draws the same extra requirements.
pub struct StartCombat {
    gate: Arc<SessionGate>,
    catalog: Arc<dyn ContentCatalog>,
    clock: Arc<dyn ClockPort>,
}

impl StartCombat {
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
        request: CombatRequest,
    ) -> Result<Committed<CombatOpened>, ActionError> {
        let mut open = self.gate.open(session_id).await?;
        open.session.ensure_member(player_id)?;
        open.session.ensure_in_progress()?;
        if open.session.active_combat().is_some() {
            return Err(ActionError::invalid_state("a combat is already running"));
        }

        let enemy = self
            .catalog
            .enemy(&request.enemy_id)
            .ok_or_else(|| ActionError::not_found("enemy", &request.enemy_id))?;

        let base_requirements = request.base_requirements.unwrap_or(enemy.requirements);
        if base_requirements.iter().any(|req| req.count == 0) {
            return Err(ActionError::Invalid(
                "requirement counts must be positive".into(),
            ));
        }

        let roster_size = open.session.player_ids.len();
        let active_players = request
            .player_count
            .map(|count| count as usize)
            .unwrap_or(roster_size);
        if active_players == 0 {
            return Err(ActionError::Invalid("player_count must be positive".into()));
        }
        if active_players > roster_size {
            return Err(ActionError::Invalid(format!(
                "player_count {active_players} exceeds the {roster_size} players in the session"
            )));
        }

        let event_index = open.session.game_state.current_event_index.to_string();
        let encounter_seed = derive_seed(
            SeedPurpose::Encounter,
            &[
                &session_id.to_string(),
                enemy.id.as_str(),
                &event_index,
            ],
        );

        let start = CombatState::start(
            CombatSetup {
                enemy_id: enemy.id.clone(),
                enemy_damage: request.enemy_damage.unwrap_or(enemy.damage),
                base_requirements,
                active_players,
                encounter_seed,
                modifiers: request.modifiers,
            },
            self.clock.now(),
        );

        let opened = CombatOpened {
            enemy_id: start.combat.enemy_id.clone(),
            enemy_damage: start.combat.enemy_damage,
            scaled_requirements: start.scaled_requirements,
            remaining_requirements: start.combat.remaining_requirements.clone(),
            current_round: start.combat.current_round,
        };
        open.session.game_state.combat_state = Some(start.combat);

        tracing::info!(
            session_id = %session_id,
            enemy_id = %opened.enemy_id,
            players = active_players,
            seed = %encounter_seed,
            "Combat started"
        );

        self.gate.commit(open, opened).await
    }
}
