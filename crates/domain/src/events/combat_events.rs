//! Combat-related domain events

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;
use crate::value_objects::{DiceRequirement, DiceRoll};

/// What one roll did against the enemy. This is what gets announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub roll: DiceRoll,
    pub was_successful: bool,
    /// Requirement count actually removed (0, 1 or 2)
    pub success_count: u32,
    /// Retaliation owed by the acting player, before armor
    pub damage_taken: u32,
    pub was_blocked: bool,
    pub is_victory: bool,
}

/// Full output of resolving a roll: the announced result plus the state it leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollResolution {
    pub result: RollResult,
    pub remaining_requirements: Vec<DiceRequirement>,
    pub blocked_turns_remaining: u32,
}

/// Round barrier state after a confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierStatus {
    /// Some session players have not confirmed yet
    Waiting { pending: usize },
    /// Everyone confirmed; the new round number
    RoundAdvanced { round: u32 },
    /// The roll won the fight; there is no next round
    CombatWon,
}

/// Outcome of a confirmed roll being folded into the combat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedRoll {
    pub result: RollResult,
    /// Round the roll was confirmed in
    pub round: u32,
    pub barrier: BarrierStatus,
}

/// A round released without waiting for everyone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRound {
    pub skipped_players: Vec<PlayerId>,
    /// Round that opens after the skip
    pub round: u32,
}
