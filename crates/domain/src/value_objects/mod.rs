//! Value objects - Immutable objects defined by their attributes

mod dice;
mod seed;
mod stat;

pub use dice::{DiceRequirement, DiceRoll};
pub use seed::{derive_seed, Seed, SeedPurpose, SeededSequence};
pub use stat::Stat;
