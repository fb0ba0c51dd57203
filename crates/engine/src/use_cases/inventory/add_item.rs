use std::sync::Arc;

use donjon_domain::{InventoryItem, ItemId, PlayerId, SessionId};

use crate::infrastructure::ports::ContentCatalog;
use crate::use_cases::{ActionError, Committed, SessionGate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAdded {
    pub player_id: PlayerId,
    pub inventory: Vec<InventoryItem>,
}

/// Put a catalog item into the player's inventory.
pub struct AddItem {
    gate: Arc<SessionGate>,
    catalog: Arc<dyn ContentCatalog>,
    default_capacity: usize,
}

impl AddItem {
    pub fn new(
        gate: Arc<SessionGate>,
        catalog: Arc<dyn ContentCatalog>,
        default_capacity: usize,
    ) -> Self {
        Self {
            gate,
            catalog,
            default_capacity,
        }
    }

    /// `capacity` overrides the configured inventory size for this call.
    pub async fn execute(
        &self,
        session_id: SessionId,
        player_id: &PlayerId,
        item_id: &ItemId,
        capacity: Option<usize>,
    ) -> Result<Committed<ItemAdded>, ActionError> {
        let item = self
            .catalog
            .item(item_id)
            .ok_or_else(|| ActionError::not_found("item", item_id))?;

        let mut open = self.gate.open(session_id).await?;
        open.session.ensure_member(player_id)?;
        let state = open.session.player_state_mut(player_id)?;

        let slot = state.add_item(item.id, capacity.unwrap_or(self.default_capacity))?;
        slot.uses = item.uses;

        let added = ItemAdded {
            player_id: player_id.clone(),
            inventory: state.inventory.clone(),
        };
        self.gate.commit(open, added).await
    }
}
