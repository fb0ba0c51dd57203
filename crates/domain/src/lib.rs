//! Donjon domain: the pure, deterministic core of a party dungeon crawl.
//!
//! Nothing in here performs I/O or reads a clock on its own. Every random draw flows
//! from an explicit [`Seed`] through a [`SeededSequence`], so two independent processes
//! fed the same seed and content produce the same adventure and the same combat.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    CombatModifiers, CombatSetup, CombatStart, CombatState, InventoryItem, PlayerState,
    SessionGameState, SessionRecord, SessionStatus, DEFAULT_MAX_PLAYERS,
};
pub use entities::{
    check_sortable_ids, randomize_adventure, AdventureDefinition, ConsumableEffect, EnemyDefinition, EventDefinition,
    ItemDefinition, ItemKind, RandomizedAdventure,
};
pub use error::DomainError;
pub use events::{
    BarrierStatus, ConfirmedRoll, ConsumableError, ConsumableUse, DamageOutcome, InventoryFull,
    RollResolution, RollResult, SkippedRound,
};
pub use ids::{AdventureId, CharacterId, ConnectionId, EnemyId, EventId, ItemId, PlayerId, SessionId};
pub use value_objects::{derive_seed, DiceRequirement, DiceRoll, Seed, SeedPurpose, SeededSequence, Stat};
