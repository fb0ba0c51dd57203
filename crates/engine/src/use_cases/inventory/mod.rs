//! Inventory use cases.
//!
//! Item effects, uses and armor always come from the catalog, never from the
//! client.

use std::sync::Arc;

use donjon_domain::PlayerState;

use crate::infrastructure::ports::ContentCatalog;

mod add_item;
mod use_item;

pub use add_item::{AddItem, ItemAdded};
pub use use_item::{ItemUsage, UseItem};

/// Container for inventory use cases.
pub struct InventoryUseCases {
    pub use_item: Arc<UseItem>,
    pub add_item: Arc<AddItem>,
}

impl InventoryUseCases {
    pub fn new(use_item: Arc<UseItem>, add_item: Arc<AddItem>) -> Self {
        Self { use_item, add_item }
    }
}

/// Total armor of every carried item known to the catalog.
pub fn armor_for(catalog: &dyn ContentCatalog, state: &PlayerState) -> u32 {
    state
        .inventory
        .iter()
        .filter_map(|slot| catalog.item(&slot.item_id))
        .filter_map(|item| item.armor)
        .sum()
}
