//! Dice roll and requirement value objects

use serde::{Deserialize, Serialize};

use super::Stat;

/// A physical dice result as reported by a player.
///
/// The face value itself never matters to resolution, only the stat it shows
/// and whether the two dice matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub stat: Stat,
    #[serde(default)]
    pub is_double: bool,
    /// Set when the player spent a reroll potion on this roll
    #[serde(default)]
    pub used_reroll: bool,
}

impl DiceRoll {
    pub fn single(stat: Stat) -> Self {
        Self {
            stat,
            is_double: false,
            used_reroll: false,
        }
    }

    pub fn double(stat: Stat) -> Self {
        Self {
            stat,
            is_double: true,
            used_reroll: false,
        }
    }

    /// Same roll showing a different stat
    pub fn with_stat(self, stat: Stat) -> Self {
        Self { stat, ..self }
    }
}

/// How many more successes of one stat an enemy still demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRequirement {
    pub stat: Stat,
    pub count: u32,
}

impl DiceRequirement {
    pub fn new(stat: Stat, count: u32) -> Self {
        Self { stat, count }
    }

    /// Add one to the matching entry of a pool, appending `{stat, 1}` when absent.
    pub fn merge_into(pool: &mut Vec<DiceRequirement>, stat: Stat) {
        match pool.iter_mut().find(|req| req.stat == stat) {
            Some(existing) => existing.count = existing.count.saturating_add(1),
            None => pool.push(DiceRequirement::new(stat, 1)),
        }
    }

    /// True once nothing in the pool is owed any more.
    pub fn all_satisfied(pool: &[DiceRequirement]) -> bool {
        pool.iter().all(|req| req.count == 0)
    }
}
