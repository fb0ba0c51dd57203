//! Combat aggregate: one enemy, a shared requirement pool and a round barrier.
//!
//! Every player in the session rolls against the same pool. A round only ends
//! once every session player has confirmed a roll for it, so the barrier is the
//! set of confirmed player ids compared against the session roster.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::events::{BarrierStatus, ConfirmedRoll, RollResolution, RollResult, SkippedRound};
use crate::ids::{EnemyId, PlayerId};
use crate::value_objects::{DiceRequirement, DiceRoll, Seed, SeededSequence, Stat};

/// Class conditions and event effects layered on top of an enemy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatModifiers {
    /// Extra stats the party must roll, merged into the pool at start
    #[serde(default)]
    pub extra_requirements: Vec<Stat>,
    #[serde(default)]
    pub extra_damage_per_turn: u32,
    /// Doubles count as plain rolls: no double reduction and no block
    #[serde(default)]
    pub doubles_disabled: bool,
}

/// Everything needed to open a combat.
#[derive(Debug, Clone)]
pub struct CombatSetup {
    pub enemy_id: EnemyId,
    pub enemy_damage: u32,
    pub base_requirements: Vec<DiceRequirement>,
    pub active_players: usize,
    pub encounter_seed: Seed,
    pub modifiers: CombatModifiers,
}

/// A freshly opened combat plus the stats drawn to scale it to the party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatStart {
    pub combat: CombatState,
    pub scaled_requirements: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    pub enemy_id: EnemyId,
    pub enemy_damage: u32,
    pub is_active: bool,
    pub remaining_requirements: Vec<DiceRequirement>,
    #[serde(default)]
    pub confirmed_players: BTreeSet<PlayerId>,
    pub current_round: u32,
    #[serde(default)]
    pub blocked_turns_remaining: u32,
    #[serde(default)]
    pub modifiers: CombatModifiers,
    /// When the current round opened; drives the stalled-round sweep
    #[serde(default)]
    pub round_started_at: Option<DateTime<Utc>>,
}

impl CombatState {
    /// Open a combat scaled to the party.
    ///
    /// One stat per active player is drawn from [`Stat::ALL`] with the encounter
    /// seed and merged into the base requirements, then the modifier's extra
    /// requirements are merged the same way.
    pub fn start(setup: CombatSetup, now: DateTime<Utc>) -> CombatStart {
        let mut rng = SeededSequence::new(setup.encounter_seed);
        let scaled_requirements: Vec<Stat> = (0..setup.active_players)
            .map(|_| Stat::ALL[rng.next_index(Stat::ALL.len())])
            .collect();

        let mut pool = setup.base_requirements;
        for stat in scaled_requirements
            .iter()
            .chain(setup.modifiers.extra_requirements.iter())
        {
            DiceRequirement::merge_into(&mut pool, *stat);
        }

        let combat = Self {
            enemy_id: setup.enemy_id,
            enemy_damage: setup.enemy_damage,
            is_active: !DiceRequirement::all_satisfied(&pool),
            remaining_requirements: pool,
            confirmed_players: BTreeSet::new(),
            current_round: 1,
            blocked_turns_remaining: 0,
            modifiers: setup.modifiers,
            round_started_at: Some(now),
        };

        CombatStart {
            combat,
            scaled_requirements,
        }
    }

    /// Resolve a roll against the current snapshot without touching it.
    pub fn preview(&self, roll: &DiceRoll) -> RollResolution {
        resolve_roll(
            roll,
            &self.remaining_requirements,
            self.enemy_damage,
            self.blocked_turns_remaining,
            &self.modifiers,
        )
    }

    pub fn has_confirmed(&self, player_id: &PlayerId) -> bool {
        self.confirmed_players.contains(player_id)
    }

    /// Session players who still owe a roll this round, in roster order.
    pub fn pending_players(&self, session_players: &[PlayerId]) -> Vec<PlayerId> {
        session_players
            .iter()
            .filter(|id| !self.confirmed_players.contains(*id))
            .cloned()
            .collect()
    }

    /// Fold one player's roll into the combat and update the round barrier.
    ///
    /// Rejects a player outside the roster and a second confirmation in the same
    /// round. A winning roll closes the combat without opening a new round.
    pub fn confirm(
        &mut self,
        player_id: &PlayerId,
        roll: &DiceRoll,
        session_players: &[PlayerId],
        now: DateTime<Utc>,
    ) -> Result<ConfirmedRoll, DomainError> {
        if !self.is_active {
            return Err(DomainError::invalid_state("no active combat"));
        }
        if !session_players.contains(player_id) {
            return Err(DomainError::not_found("player", player_id.as_str()));
        }
        if self.has_confirmed(player_id) {
            return Err(DomainError::invalid_state(format!(
                "player {player_id} already confirmed round {}",
                self.current_round
            )));
        }

        let resolution = self.preview(roll);
        let round = self.current_round;
        self.remaining_requirements = resolution.remaining_requirements;
        self.blocked_turns_remaining = resolution.blocked_turns_remaining;
        self.confirmed_players.insert(player_id.clone());

        let barrier = if resolution.result.is_victory {
            self.is_active = false;
            BarrierStatus::CombatWon
        } else {
            self.release_if_complete(session_players, now)
        };

        Ok(ConfirmedRoll {
            result: resolution.result,
            round,
            barrier,
        })
    }

    /// Release the current round without waiting for the missing players.
    /// They are reported as skipped: no roll, no damage.
    pub fn skip_round(
        &mut self,
        session_players: &[PlayerId],
        now: DateTime<Utc>,
    ) -> Result<SkippedRound, DomainError> {
        if !self.is_active {
            return Err(DomainError::invalid_state("no active combat"));
        }

        let skipped_players = self.pending_players(session_players);
        self.open_next_round(now);

        Ok(SkippedRound {
            skipped_players,
            round: self.current_round,
        })
    }

    /// True when the open round has been waiting longer than `timeout`.
    pub fn round_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        self.is_active
            && self
                .round_started_at
                .is_some_and(|started| now - started >= timeout)
    }

    /// A participant died: the fight is over regardless of the pool.
    pub fn end_in_defeat(&mut self) {
        self.is_active = false;
    }

    fn release_if_complete(
        &mut self,
        session_players: &[PlayerId],
        now: DateTime<Utc>,
    ) -> BarrierStatus {
        let pending = self.pending_players(session_players).len();
        if pending > 0 {
            return BarrierStatus::Waiting { pending };
        }

        self.open_next_round(now);
        BarrierStatus::RoundAdvanced {
            round: self.current_round,
        }
    }

    fn open_next_round(&mut self, now: DateTime<Utc>) {
        self.current_round += 1;
        self.confirmed_players.clear();
        self.round_started_at = Some(now);
    }
}

/// Resolve one roll against a requirement pool.
///
/// The first entry with the roll's stat and a non-zero count loses 2 on a double
/// and 1 otherwise, capped at its count. If that empties the pool the fight is
/// won and nothing hits back. Otherwise a double blocks the retaliation, then a
/// banked blocked turn does, and failing both the player takes the enemy damage
/// plus any per-turn modifier.
pub fn resolve_roll(
    roll: &DiceRoll,
    requirements: &[DiceRequirement],
    enemy_damage: u32,
    blocked_turns_remaining: u32,
    modifiers: &CombatModifiers,
) -> RollResolution {
    let is_double = roll.is_double && !modifiers.doubles_disabled;

    let mut remaining_requirements = requirements.to_vec();
    let success_count = remaining_requirements
        .iter_mut()
        .find(|req| req.stat == roll.stat && req.count > 0)
        .map(|req| {
            let reduction: u32 = if is_double { 2 } else { 1 };
            let reduction = reduction.min(req.count);
            req.count -= reduction;
            reduction
        })
        .unwrap_or(0);

    let is_victory = DiceRequirement::all_satisfied(&remaining_requirements);

    let mut blocked_turns_remaining = blocked_turns_remaining;
    let (damage_taken, was_blocked) = if is_victory {
        (0, false)
    } else if is_double {
        (0, true)
    } else if blocked_turns_remaining > 0 {
        blocked_turns_remaining -= 1;
        (0, true)
    } else {
        (enemy_damage.saturating_add(modifiers.extra_damage_per_turn), false)
    };

    RollResolution {
        result: RollResult {
            roll: *roll,
            was_successful: success_count > 0,
            success_count,
            damage_taken,
            was_blocked,
            is_victory,
        },
        remaining_requirements,
        blocked_turns_remaining,
    }
}
