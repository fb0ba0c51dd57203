//! Session lifecycle use cases: joining, character selection, start and progression.

use std::sync::Arc;

use donjon_domain::{
    derive_seed, randomize_adventure, AdventureId, ItemDefinition, RandomizedAdventure, Seed,
    SeedPurpose, SeededSequence, SessionId,
};

use crate::infrastructure::ports::ContentCatalog;

use super::ActionError;

mod join;
mod progress;
mod select_character;
mod start_game;

pub use join::JoinSession;
pub use progress::{AdvanceEvent, EndGame};
pub use select_character::{CharacterSelection, SelectCharacter};
pub use start_game::{GameStart, StartGame};

/// Container for session use cases.
pub struct SessionUseCases {
    pub join: Arc<JoinSession>,
    pub select_character: Arc<SelectCharacter>,
    pub start_game: Arc<StartGame>,
    pub advance_event: Arc<AdvanceEvent>,
    pub end_game: Arc<EndGame>,
}

impl SessionUseCases {
    pub fn new(
        join: Arc<JoinSession>,
        select_character: Arc<SelectCharacter>,
        start_game: Arc<StartGame>,
        advance_event: Arc<AdvanceEvent>,
        end_game: Arc<EndGame>,
    ) -> Self {
        Self {
            join,
            select_character,
            start_game,
            advance_event,
            end_game,
        }
    }
}

/// Event order and boss of `adventure_id` for `seed`, from catalog content.
pub fn randomize_from_catalog(
    catalog: &dyn ContentCatalog,
    adventure_id: &AdventureId,
    seed: Seed,
) -> Result<RandomizedAdventure, ActionError> {
    let adventure = catalog
        .adventure(adventure_id)
        .ok_or_else(|| ActionError::not_found("adventure", adventure_id))?;

    let event_ids: Vec<_> = catalog
        .event_pool(&adventure.events_key)
        .into_iter()
        .map(|event| event.id)
        .collect();

    Ok(randomize_adventure(
        &adventure.id,
        &event_ids,
        &adventure.boss_ids,
        seed,
    )?)
}

/// The item every player starts with, drawn from the id-sorted catalog items.
pub fn draw_starting_item(
    items: &[ItemDefinition],
    session_id: SessionId,
    adventure_seed: Seed,
) -> Option<&ItemDefinition> {
    if items.is_empty() {
        return None;
    }
    let seed = derive_seed(
        SeedPurpose::StartingItem,
        &[&session_id.to_string(), &adventure_seed.to_string()],
    );
    let index = SeededSequence::new(seed).next_index(items.len());
    items.get(index)
}
