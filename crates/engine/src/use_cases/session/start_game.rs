use std::sync::Arc;

use donjon_domain::{
    derive_seed, AdventureId, ItemId, PlayerId, RandomizedAdventure, Seed, SeedPurpose, SessionGameState,
    SessionId, SessionStatus,
};

use crate::infrastructure::ports::{ClockPort, ContentCatalog};
use crate::use_cases::{ActionError, Committed, SessionGate};

use super::{draw_starting_item, randomize_from_catalog};

#[derive(Debug, Clone)]
pub struct GameStart {
    pub adventure_id: AdventureId,
    pub adventure_seed: Seed,
    pub randomized_adventure: RandomizedAdventure,
    pub starting_item_id: Option<ItemId>,
    pub game_state: SessionGameState,
    /// False when the game was already running and nothing changed
    pub newly_started: bool,
}

/// Start the adventure.
///
/// The seed, event order and starting item are decided once. Starting an
/// already running game replays the stored values without touching the record.
pub struct StartGame {
    gate: Arc<SessionGate>,
    catalog: Arc<dyn ContentCatalog>,
    clock: Arc<dyn ClockPort>,
    inventory_capacity: usize,
}

impl StartGame {
    pub fn new(
        gate: Arc<SessionGate>,
        catalog: Arc<dyn ContentCatalog>,
        clock: Arc<dyn ClockPort>,
        inventory_capacity: usize,
    ) -> Self {
        Self {
            gate,
            catalog,
            clock,
            inventory_capacity,
        }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
        player_id: &PlayerId,
    ) -> Result<Committed<GameStart>, ActionError> {
        let mut open = self.gate.open(session_id).await?;
        open.session.ensure_member(player_id)?;

        if open.session.status == SessionStatus::InProgress {
            let state = &open.session.game_state;
            if let (Some(seed), Some(randomized)) =
                (state.adventure_seed, state.randomized_adventure.clone())
            {
                let replay = GameStart {
                    adventure_id: open.session.adventure_id.clone(),
                    adventure_seed: seed,
                    randomized_adventure: randomized,
                    starting_item_id: state.starting_item_id.clone(),
                    game_state: state.clone(),
                    newly_started: false,
                };
                return Ok(SessionGate::hold(open, replay));
            }
        }

        open.session.begin()?;

        let started_at = self.clock.now().timestamp_millis().to_string();
        let seed = derive_seed(
            SeedPurpose::Adventure,
            &[&session_id.to_string(), &started_at],
        );
        let randomized =
            randomize_from_catalog(self.catalog.as_ref(), &open.session.adventure_id, seed)?;

        let items = self.catalog.items();
        let starting_item = draw_starting_item(&items, session_id, seed);

        let session = &mut open.session;
        if let Some(item) = starting_item {
            for (id, state) in session.game_state.player_states.iter_mut() {
                match state.add_item(item.id.clone(), self.inventory_capacity) {
                    Ok(slot) => slot.uses = item.uses,
                    Err(full) => tracing::debug!(
                        session_id = %session_id,
                        player_id = %id,
                        capacity = full.capacity,
                        "Starting item skipped, inventory full"
                    ),
                }
            }
        }

        session.game_state.adventure_seed = Some(seed);
        session.game_state.randomized_adventure = Some(randomized.clone());
        session.game_state.starting_item_id = starting_item.map(|item| item.id.clone());
        session.game_state.current_event_index = 0;

        tracing::info!(
            session_id = %session_id,
            adventure_id = %session.adventure_id,
            seed = %seed,
            boss_id = %randomized.boss_id,
            "Game started"
        );

        let start = GameStart {
            adventure_id: session.adventure_id.clone(),
            adventure_seed: seed,
            randomized_adventure: randomized,
            starting_item_id: session.game_state.starting_item_id.clone(),
            game_state: session.game_state.clone(),
            newly_started: true,
        };
        self.gate.commit(open, start).await
    }
}
