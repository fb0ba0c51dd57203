//! WebSocket message types for engine-client communication
//!
//! Every frame is a JSON object tagged by `type`, e.g.
//! `{"type":"ConfirmRoll","roll":{"stat":"force","is_double":true}}`.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown variants deserialize to `Unknown` for forward compatibility
//!
//! Only `JoinRoom` names a session and a player. Every later message acts on the
//! session the connection joined.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use donjon_domain::{
    CombatModifiers, ConsumableUse, DiceRequirement, DiceRoll, InventoryItem,
    RandomizedAdventure, RollResult, SessionGameState, SessionStatus, Stat,
};

use crate::responses::ErrorCode;
use crate::types::{GameEndReason, ItemAddFailure};

// =============================================================================
// Client Messages (client → engine)
// =============================================================================

/// Messages from a game client to the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Bind this connection to a player of an existing session
    JoinRoom {
        session_id: Uuid,
        player_id: String,
        #[serde(default)]
        display_name: Option<String>,
    },
    /// Leave the joined session (the connection stays open)
    LeaveRoom,
    /// Pick or change character
    SelectCharacter { character_id: String, max_hp: u32 },
    /// Start the adventure
    StartGame,
    /// Preview a roll against the active combat
    RollDice { roll: DiceRoll },
    /// Commit a roll; the engine recomputes the result
    ConfirmRoll { roll: DiceRoll },
    /// Open a combat against an enemy of the current event
    CombatStarted {
        enemy_id: String,
        /// Overrides the catalog damage (event scaling)
        #[serde(default)]
        enemy_damage: Option<u32>,
        /// Overrides the session roster size
        #[serde(default)]
        player_count: Option<u32>,
        /// Overrides the catalog requirements
        #[serde(default)]
        base_requirements: Option<Vec<DiceRequirement>>,
        #[serde(default)]
        modifiers: Option<CombatModifiers>,
    },
    /// Use a consumable from the inventory
    UseItem { item_id: String },
    /// Add a catalog item to the inventory
    AddItem {
        item_id: String,
        #[serde(default)]
        max_inventory_size: Option<u32>,
    },
    /// Resolve an event choice; negative damage heals
    EventChoice {
        choice_id: String,
        #[serde(default)]
        stat_check_result: Option<bool>,
        #[serde(default)]
        damage: Option<i32>,
    },
    /// Move to the next event of the adventure
    NextEvent,
    /// Hand the turn to another player
    NextTurn { next_player_id: String },
    /// End the game
    GameOver { victory: bool },
    /// Host only: release the current combat round now
    ForceAdvanceRound,
    /// Room chat
    Chat { message: String },
    /// Vote for who opens the next event
    VoteEventOpener { voted_for_id: String },
    /// Announce who opens the next event
    SelectEventOpener { player_id: String },
    /// Heartbeat ping
    Heartbeat,

    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Name of the variant, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "JoinRoom",
            Self::LeaveRoom => "LeaveRoom",
            Self::SelectCharacter { .. } => "SelectCharacter",
            Self::StartGame => "StartGame",
            Self::RollDice { .. } => "RollDice",
            Self::ConfirmRoll { .. } => "ConfirmRoll",
            Self::CombatStarted { .. } => "CombatStarted",
            Self::UseItem { .. } => "UseItem",
            Self::AddItem { .. } => "AddItem",
            Self::EventChoice { .. } => "EventChoice",
            Self::NextEvent => "NextEvent",
            Self::NextTurn { .. } => "NextTurn",
            Self::GameOver { .. } => "GameOver",
            Self::ForceAdvanceRound => "ForceAdvanceRound",
            Self::Chat { .. } => "Chat",
            Self::VoteEventOpener { .. } => "VoteEventOpener",
            Self::SelectEventOpener { .. } => "SelectEventOpener",
            Self::Heartbeat => "Heartbeat",
            Self::Unknown => "Unknown",
        }
    }
}

// =============================================================================
// Server Messages (engine → clients)
// =============================================================================

/// Messages from the engine to game clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// A player bound a connection to the session
    PlayerJoined {
        player_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
    },
    /// Full snapshot, sent to a joining connection
    SessionState {
        session_id: Uuid,
        player_ids: Vec<String>,
        status: SessionStatus,
        game_state: SessionGameState,
    },
    PlayerLeft { player_id: String },
    /// A player's connection dropped without leaving
    PlayerDisconnected { player_id: String },
    CharacterSelected {
        player_id: String,
        character_id: String,
        current_hp: u32,
        max_hp: u32,
    },
    GameStarted {
        adventure_id: String,
        adventure_seed: u32,
        randomized_adventure: RandomizedAdventure,
        #[serde(default)]
        starting_item_id: Option<String>,
        game_state: SessionGameState,
    },
    /// A roll was thrown; carries a preview when a combat is running
    DiceRolled {
        player_id: String,
        roll: DiceRoll,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        roll_result: Option<RollResult>,
    },
    RollConfirmed {
        player_id: String,
        roll_result: RollResult,
        remaining_requirements: Vec<DiceRequirement>,
        is_victory: bool,
        current_round: u32,
    },
    PlayerHpUpdated { player_id: String, hp: u32 },
    /// Everyone confirmed: the next round is open
    AllRollsReady { round: u32 },
    /// A round was released without some players
    RoundSkipped {
        round: u32,
        skipped_players: Vec<String>,
    },
    GameEnded {
        victory: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<GameEndReason>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player_id: Option<String>,
    },
    CombatStarted {
        enemy_id: String,
        enemy_damage: u32,
        scaled_requirements: Vec<Stat>,
        remaining_requirements: Vec<DiceRequirement>,
        current_round: u32,
    },
    ItemUsed {
        player_id: String,
        item_id: String,
        result: ConsumableUse,
    },
    PlayerInventoryUpdated {
        player_id: String,
        inventory: Vec<InventoryItem>,
    },
    /// Sent only to the requester
    ItemAddFailed {
        item_id: String,
        reason: ItemAddFailure,
    },
    EventChoiceMade {
        player_id: String,
        choice_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stat_check_result: Option<bool>,
    },
    EventChanged { current_event_index: u32 },
    TurnChanged { current_player_id: String },
    ChatMessage {
        player_id: String,
        message: String,
        timestamp: i64,
    },
    EventOpenerVoted {
        voter_id: String,
        voted_for_id: String,
    },
    EventOpenerSelected { player_id: String },
    /// Error message, sent only to the requester
    Error { code: ErrorCode, message: String },
    /// Heartbeat response
    Pong,

    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }
}
