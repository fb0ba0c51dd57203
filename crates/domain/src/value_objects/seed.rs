//! Seeded sequence generator and seed derivation.
//!
//! The generator is a tiny linear congruential generator shared with every game
//! client. It is not a good source of randomness, and it does not need to be: its
//! only job is to let independent processes replay the exact same draws from a
//! shared seed. Do not swap it for `rand` or tweak the constants, because existing
//! clients replay it bit for bit.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const LCG_MULTIPLIER: u64 = 9301;
pub const LCG_INCREMENT: u64 = 49297;
pub const LCG_MODULUS: u64 = 233_280;

/// Seed for one deterministic stream (adventure order, encounter scaling, starting item)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(u32);

impl Seed {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Running state of the generator.
///
/// `state' = (state * 9301 + 49297) mod 233280` and the emitted value is
/// `state' / 233280`, so every value lies in `[0, 1)`. All intermediate products
/// stay below 2^53, which keeps the float division identical to clients that
/// compute it in double precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededSequence {
    state: u64,
}

impl SeededSequence {
    pub fn new(seed: Seed) -> Self {
        Self {
            state: u64::from(seed.value()),
        }
    }

    /// One step of the recurrence as a pure function: `(value, next_state)`.
    pub fn step(state: u64) -> (f64, u64) {
        let next = (state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        (next as f64 / LCG_MODULUS as f64, next)
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn next_value(&mut self) -> f64 {
        let (value, next) = Self::step(self.state);
        self.state = next;
        value
    }

    /// `floor(value * bound)`; always consumes exactly one draw.
    ///
    /// `bound` must be non-zero; a zero bound yields 0.
    pub fn next_index(&mut self, bound: usize) -> usize {
        let value = self.next_value();
        ((value * bound as f64).floor() as usize).min(bound.saturating_sub(1))
    }
}

impl Iterator for SeededSequence {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_value())
    }
}

/// What a derived seed is used for. The tag is hashed first so two purposes
/// never share a stream even with identical parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPurpose {
    /// Parts: session id, game start time in unix millis
    Adventure,
    /// Parts: session id, enemy id, current event index
    Encounter,
    /// Parts: session id, adventure seed
    StartingItem,
}

impl SeedPurpose {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Adventure => "adventure",
            Self::Encounter => "encounter",
            Self::StartingItem => "starting-item",
        }
    }
}

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const PART_SEPARATOR: u8 = 0x1f;

/// Derive a seed as 32-bit FNV-1a over the purpose tag and each part, every
/// chunk terminated by a unit separator (0x1f) so `["ab", "c"]` and `["a", "bc"]`
/// hash differently.
pub fn derive_seed(purpose: SeedPurpose, parts: &[&str]) -> Seed {
    let chunks = std::iter::once(purpose.tag()).chain(parts.iter().copied());
    let hash = chunks
        .flat_map(|chunk| chunk.bytes().chain(std::iter::once(PART_SEPARATOR)))
        .fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
        });
    Seed(hash)
}
