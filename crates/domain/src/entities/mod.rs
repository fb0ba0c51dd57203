//! Entities - catalog content and the per-session adventure built from it

mod adventure;
mod content;

pub use adventure::{
    check_sortable_ids, randomize_adventure, AdventureDefinition, RandomizedAdventure,
};
pub use content::{ConsumableEffect, EnemyDefinition, EventDefinition, ItemDefinition, ItemKind};
