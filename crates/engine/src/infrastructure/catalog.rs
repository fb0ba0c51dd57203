//! Static content catalog loaded from JSON.
//!
//! The catalog is validated once at load. An engine with broken content refuses
//! to start rather than failing mid-game.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tokio::fs;

use donjon_domain::{
    check_sortable_ids, AdventureDefinition, AdventureId, EnemyDefinition, EnemyId, EventDefinition, ItemDefinition,
    ItemId,
};

use crate::infrastructure::ports::ContentCatalog;

const BUNDLED_CATALOG: &str = include_str!("../../content/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Inconsistent catalog: {0}")]
    Invalid(String),
}

/// On-disk layout of the catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    adventures: Vec<AdventureDefinition>,
    events: BTreeMap<String, Vec<EventDefinition>>,
    enemies: Vec<EnemyDefinition>,
    items: Vec<ItemDefinition>,
}

pub struct StaticCatalog {
    adventures: HashMap<AdventureId, AdventureDefinition>,
    events: BTreeMap<String, Vec<EventDefinition>>,
    enemies: HashMap<EnemyId, EnemyDefinition>,
    /// Sorted by id
    items: Vec<ItemDefinition>,
}

impl StaticCatalog {
    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::validated(file)
    }

    fn validated(file: CatalogFile) -> Result<Self, CatalogError> {
        let mut enemies = HashMap::new();
        for enemy in file.enemies {
            if enemy.requirements.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "enemy {} has no requirements",
                    enemy.id
                )));
            }
            let id = enemy.id.clone();
            if enemies.insert(id.clone(), enemy).is_some() {
                return Err(CatalogError::Invalid(format!("duplicate enemy {id}")));
            }
        }

        for (key, events) in &file.events {
            for event in events {
                if let Some(enemy_id) = &event.enemy_id {
                    if !enemies.contains_key(enemy_id) {
                        return Err(CatalogError::Invalid(format!(
                            "event {} in pool {key} references unknown enemy {enemy_id}",
                            event.id
                        )));
                    }
                }
            }
        }

        let mut adventures = HashMap::new();
        for adventure in file.adventures {
            if !file.events.contains_key(&adventure.events_key) {
                return Err(CatalogError::Invalid(format!(
                    "adventure {} references unknown event pool {}",
                    adventure.id, adventure.events_key
                )));
            }
            if adventure.boss_ids.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "adventure {} has no boss",
                    adventure.id
                )));
            }
            if let Some(missing) = adventure
                .boss_ids
                .iter()
                .find(|boss_id| !enemies.contains_key(*boss_id))
            {
                return Err(CatalogError::Invalid(format!(
                    "adventure {} references unknown boss {missing}",
                    adventure.id
                )));
            }
            let pool = &file.events[&adventure.events_key];
            check_sortable_ids(pool.iter().map(|event| event.id.as_str()))
                .and_then(|()| check_sortable_ids(adventure.boss_ids.iter().map(EnemyId::as_str)))
                .map_err(|e| {
                    CatalogError::Invalid(format!("adventure {}: {e}", adventure.id))
                })?;
            adventures.insert(adventure.id.clone(), adventure);
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = file.items.iter().find(|item| !seen.insert(item.id.clone())) {
            return Err(CatalogError::Invalid(format!(
                "duplicate item {}",
                duplicate.id
            )));
        }
        check_sortable_ids(file.items.iter().map(|item| item.id.as_str()))
            .map_err(|e| CatalogError::Invalid(format!("items: {e}")))?;
        let mut items = file.items;
        items.sort_by(|a, b| a.id.cmp(&b.id));

        tracing::debug!(
            adventures = adventures.len(),
            enemies = enemies.len(),
            items = items.len(),
            "Content catalog validated"
        );

        Ok(Self {
            adventures,
            events: file.events,
            enemies,
            items,
        })
    }
}

impl ContentCatalog for StaticCatalog {
    fn adventure(&self, id: &AdventureId) -> Option<AdventureDefinition> {
        self.adventures.get(id).cloned()
    }

    fn event_pool(&self, events_key: &str) -> Vec<EventDefinition> {
        self.events.get(events_key).cloned().unwrap_or_default()
    }

    fn enemy(&self, id: &EnemyId) -> Option<EnemyDefinition> {
        self.enemies.get(id).cloned()
    }

    fn item(&self, id: &ItemId) -> Option<ItemDefinition> {
        self.items
            .binary_search_by(|item| item.id.cmp(id))
            .ok()
            .map(|index| self.items[index].clone())
    }

    fn items(&self) -> Vec<ItemDefinition> {
        self.items.clone()
    }
}
