//! Static content definitions as published by the content catalog.
//!
//! These are read-only for the engine. Field names follow the catalog JSON.

use serde::{Deserialize, Serialize};

use crate::ids::{EnemyId, EventId, ItemId};
use crate::value_objects::{DiceRequirement, Stat};

/// An enemy and the dice it demands before it falls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub id: EnemyId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Damage dealt to the acting player on every unblocked roll
    pub damage: u32,
    pub requirements: Vec<DiceRequirement>,
    #[serde(default)]
    pub is_boss: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
    Artifact,
    #[serde(other)]
    Other,
}

/// What a consumable does when used. Any subset may be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableEffect {
    #[serde(default)]
    pub healing: Option<u32>,
    #[serde(default)]
    pub forced_stat: Option<Stat>,
    #[serde(default)]
    pub allows_reroll: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub rarity: Option<String>,
    /// Number of uses a fresh copy starts with; absent means unlimited
    #[serde(default)]
    pub uses: Option<u32>,
    /// Flat damage reduction while carried
    #[serde(default)]
    pub armor: Option<u32>,
    #[serde(default)]
    pub consumable: Option<ConsumableEffect>,
}

/// One step of an adventure. Narrative text lives on the clients; the engine only
/// needs the id and the enemy reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enemy_id: Option<EnemyId>,
}
