use std::sync::Arc;

use donjon_domain::{ConsumableUse, InventoryItem, ItemId, PlayerId, SessionId};

use crate::infrastructure::ports::ContentCatalog;
use crate::use_cases::{ActionError, Committed, SessionGate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUsage {
    pub player_id: PlayerId,
    pub effect: ConsumableUse,
    /// HP after the item, when it heals
    pub hp_after_healing: Option<u32>,
    pub inventory: Vec<InventoryItem>,
}

/// Use a consumable from the player's inventory. A depleted item is removed.
pub struct UseItem {
    gate: Arc<SessionGate>,
    catalog: Arc<dyn ContentCatalog>,
}

impl UseItem {
    pub fn new(gate: Arc<SessionGate>, catalog: Arc<dyn ContentCatalog>) -> Self {
        Self { gate, catalog }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
        player_id: &PlayerId,
        item_id: &ItemId,
    ) -> Result<Committed<ItemUsage>, ActionError> {
        let item = self
            .catalog
            .item(item_id)
            .ok_or_else(|| ActionError::not_found("item", item_id))?;
        let effect = item
            .consumable
            .ok_or_else(|| ActionError::invalid_state(format!("item {item_id} cannot be used")))?;

        let mut open = self.gate.open(session_id).await?;
        open.session.ensure_member(player_id)?;
        let state = open.session.player_state_mut(player_id)?;

        let used = state.use_consumable(item_id, &effect)?;
        if used.depleted {
            state.remove_item(item_id);
        }

        let usage = ItemUsage {
            player_id: player_id.clone(),
            hp_after_healing: used.healing.map(|_| state.current_hp),
            inventory: state.inventory.clone(),
            effect: used,
        };

        tracing::debug!(
            session_id = %session_id,
            player_id = %player_id,
            item_id = %item_id,
            depleted = usage.effect.depleted,
            "Item used"
        );

        self.gate.commit(open, usage).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::*;
    use donjon_domain::{SessionRecord, Stat};

    fn carrying(player: &PlayerId, item: &str, uses: Option<u32>) -> SessionRecord {
        let mut session = running_session();
        session
            .player_state_mut(player)
            .unwrap()
            .inventory
            .push(InventoryItem {
                item_id: ItemId::from(item),
                uses,
            });
        session
    }

    #[tokio::test]
    async fn healing_potion_heals_and_is_removed() {
        let mut session = carrying(&bob(), "potion_soin", Some(1));
        session.player_state_mut(&bob()).unwrap().current_hp = 2;
        let harness = Harness::new().with_session(session);
        let use_item = UseItem::new(harness.gate.clone(), harness.catalog.clone());

        let usage = use_item
            .execute(session_id(), &bob(), &ItemId::from("potion_soin"))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(usage.effect.healing, Some(5));
        assert_eq!(usage.hp_after_healing, Some(7));
        assert!(usage.effect.depleted);
        assert!(usage.inventory.is_empty());
        assert!(harness.stored().await.player_state(&bob()).unwrap().inventory.is_empty());
    }

    #[tokio::test]
    async fn healing_at_full_hp_reports_zero() {
        let harness = Harness::new().with_session(carrying(&alice(), "grande_potion", Some(1)));
        let use_item = UseItem::new(harness.gate.clone(), harness.catalog.clone());

        let usage = use_item
            .execute(session_id(), &alice(), &ItemId::from("grande_potion"))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(usage.effect.healing, Some(0));
        assert_eq!(usage.hp_after_healing, Some(10));
    }

    #[tokio::test]
    async fn elixir_forces_next_roll() {
        let harness = Harness::new().with_session(carrying(&alice(), "elixir_savoir", Some(1)));
        let use_item = UseItem::new(harness.gate.clone(), harness.catalog.clone());

        let usage = use_item
            .execute(session_id(), &alice(), &ItemId::from("elixir_savoir"))
            .await
            .unwrap()
            .into_inner();

        assert!(usage.effect.consumes_turn);
        assert_eq!(usage.hp_after_healing, None);
        let stored = harness.stored().await;
        assert_eq!(
            stored.player_state(&alice()).unwrap().forced_next_roll,
            Some(Stat::Intelligence)
        );
    }

    #[tokio::test]
    async fn multi_use_item_stays_until_empty() {
        let harness = Harness::new().with_session(carrying(&alice(), "fiole_relance", Some(2)));
        let use_item = UseItem::new(harness.gate.clone(), harness.catalog.clone());

        let usage = use_item
            .execute(session_id(), &alice(), &ItemId::from("fiole_relance"))
            .await
            .unwrap()
            .into_inner();

        assert!(!usage.effect.depleted);
        assert_eq!(usage.inventory[0].uses, Some(1));
        assert!(harness.stored().await.player_state(&alice()).unwrap().potion_reroll_available);
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let harness = Harness::new().with_session(running_session());
        let use_item = UseItem::new(harness.gate.clone(), harness.catalog.clone());

        let result = use_item
            .execute(session_id(), &alice(), &ItemId::from("potion_soin"))
            .await;
        assert!(matches!(result, Err(ActionError::NotFound { .. })));
    }

    #[tokio::test]
    async fn armor_cannot_be_used() {
        let harness = Harness::new().with_session(carrying(&alice(), "bouclier_bois", None));
        let use_item = UseItem::new(harness.gate.clone(), harness.catalog.clone());

        let result = use_item
            .execute(session_id(), &alice(), &ItemId::from("bouclier_bois"))
            .await;
        assert!(matches!(result, Err(ActionError::InvalidState(_))));
    }
}
