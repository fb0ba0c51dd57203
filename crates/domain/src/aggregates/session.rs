//! Session aggregate: the persisted record every player action reads and writes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::RandomizedAdventure;
use crate::error::DomainError;
use crate::ids::{AdventureId, CharacterId, ItemId, PlayerId, SessionId};
use crate::value_objects::Seed;

use super::{CombatState, PlayerState};

pub const DEFAULT_MAX_PLAYERS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Waiting,
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGameState {
    #[serde(default)]
    pub current_event_index: u32,
    #[serde(default)]
    pub player_states: BTreeMap<PlayerId, PlayerState>,
    #[serde(default)]
    pub combat_state: Option<CombatState>,
    #[serde(default)]
    pub randomized_adventure: Option<RandomizedAdventure>,
    #[serde(default)]
    pub adventure_seed: Option<Seed>,
    #[serde(default)]
    pub starting_item_id: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    /// Room code handed out by the lobby
    pub code: String,
    pub host_id: PlayerId,
    pub player_ids: Vec<PlayerId>,
    pub adventure_id: AdventureId,
    pub max_players: u32,
    pub status: SessionStatus,
    #[serde(default)]
    pub game_state: SessionGameState,
}

impl SessionRecord {
    /// A waiting session with the host as its only player.
    pub fn new(
        id: SessionId,
        code: impl Into<String>,
        host_id: PlayerId,
        adventure_id: AdventureId,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            player_ids: vec![host_id.clone()],
            host_id,
            adventure_id,
            max_players: DEFAULT_MAX_PLAYERS,
            status: SessionStatus::Waiting,
            game_state: SessionGameState::default(),
        }
    }

    /// Add a player to the roster (lobby-side membership).
    pub fn with_player(mut self, player_id: PlayerId) -> Self {
        if !self.player_ids.contains(&player_id) {
            self.player_ids.push(player_id);
        }
        self
    }

    pub fn has_player(&self, player_id: &PlayerId) -> bool {
        self.player_ids.contains(player_id)
    }

    pub fn is_host(&self, player_id: &PlayerId) -> bool {
        &self.host_id == player_id
    }

    pub fn ensure_member(&self, player_id: &PlayerId) -> Result<(), DomainError> {
        if self.has_player(player_id) {
            Ok(())
        } else {
            Err(DomainError::not_found("player", player_id.as_str()))
        }
    }

    pub fn ensure_in_progress(&self) -> Result<(), DomainError> {
        match self.status {
            SessionStatus::InProgress => Ok(()),
            other => Err(DomainError::invalid_state(format!(
                "session is {}, not in progress",
                other.as_str()
            ))),
        }
    }

    pub fn player_state(&self, player_id: &PlayerId) -> Result<&PlayerState, DomainError> {
        self.game_state
            .player_states
            .get(player_id)
            .ok_or_else(|| DomainError::not_found("player_state", player_id.as_str()))
    }

    pub fn player_state_mut(
        &mut self,
        player_id: &PlayerId,
    ) -> Result<&mut PlayerState, DomainError> {
        self.game_state
            .player_states
            .get_mut(player_id)
            .ok_or_else(|| DomainError::not_found("player_state", player_id.as_str()))
    }

    pub fn active_combat(&self) -> Option<&CombatState> {
        self.game_state
            .combat_state
            .as_ref()
            .filter(|combat| combat.is_active)
    }

    /// Create or update the player's state for a chosen character.
    pub fn select_character(
        &mut self,
        player_id: &PlayerId,
        character_id: CharacterId,
        max_hp: u32,
    ) -> Result<&PlayerState, DomainError> {
        self.ensure_member(player_id)?;

        let state = self
            .game_state
            .player_states
            .entry(player_id.clone())
            .and_modify(|state| state.change_character(character_id.clone(), max_hp))
            .or_insert_with(|| PlayerState::new(character_id, max_hp));
        Ok(state)
    }

    /// Move to `in_progress`. Finished sessions cannot be restarted.
    pub fn begin(&mut self) -> Result<(), DomainError> {
        if self.status.is_finished() {
            return Err(DomainError::invalid_state(format!(
                "session is already {}",
                self.status.as_str()
            )));
        }
        self.status = SessionStatus::InProgress;
        Ok(())
    }

    /// End the session; any running combat stops with it.
    pub fn finish(&mut self, victory: bool) {
        self.status = if victory {
            SessionStatus::Completed
        } else {
            SessionStatus::Abandoned
        };
        if let Some(combat) = self.game_state.combat_state.as_mut() {
            combat.end_in_defeat();
        }
    }

    pub fn advance_event(&mut self) -> u32 {
        self.game_state.current_event_index += 1;
        self.game_state.current_event_index
    }
}
