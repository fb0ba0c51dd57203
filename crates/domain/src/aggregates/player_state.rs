//! Per-player state for one session: HP, inventory and potion effects.

use serde::{Deserialize, Serialize};

use crate::entities::ConsumableEffect;
use crate::error::DomainError;
use crate::events::{ConsumableError, ConsumableUse, DamageOutcome, InventoryFull};
use crate::ids::{CharacterId, ItemId};
use crate::value_objects::Stat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: ItemId,
    /// Remaining uses; `None` means unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<u32>,
}

/// Invariant: `current_hp <= max_hp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub character_id: CharacterId,
    pub current_hp: u32,
    pub max_hp: u32,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    /// Stat the next confirmed roll will show, whatever the dice said
    #[serde(default)]
    pub forced_next_roll: Option<Stat>,
    #[serde(default)]
    pub potion_reroll_available: bool,
}

impl PlayerState {
    pub fn new(character_id: CharacterId, max_hp: u32) -> Self {
        Self {
            character_id,
            current_hp: max_hp,
            max_hp,
            inventory: Vec::new(),
            forced_next_roll: None,
            potion_reroll_available: false,
        }
    }

    /// Switch character mid-session. A dead player comes back at full HP;
    /// anyone else keeps their HP, clamped to the new maximum.
    pub fn change_character(&mut self, character_id: CharacterId, max_hp: u32) {
        self.character_id = character_id;
        self.max_hp = max_hp;
        self.current_hp = if self.current_hp == 0 {
            max_hp
        } else {
            self.current_hp.min(max_hp)
        };
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp == 0
    }

    /// Apply `raw` damage. With armor the hit is reduced but never below 1,
    /// even when `raw` is 0.
    pub fn apply_damage(&mut self, raw: u32, armor_reduction: u32) -> DamageOutcome {
        let applied = if armor_reduction == 0 {
            raw
        } else {
            raw.saturating_sub(armor_reduction).max(1)
        };
        if applied == 0 {
            return DamageOutcome::Unharmed;
        }
        if self.is_dead() {
            return DamageOutcome::AlreadyDead;
        }

        self.current_hp = self.current_hp.saturating_sub(applied);

        if self.is_dead() {
            DamageOutcome::Killed { applied }
        } else {
            DamageOutcome::Wounded {
                applied,
                remaining_hp: self.current_hp,
            }
        }
    }

    /// Heal up to `max_hp`; returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
        self.current_hp.saturating_sub(before)
    }

    /// Use the first inventory entry for `item_id`.
    ///
    /// Fails without mutating anything when the item is missing or out of uses.
    /// A depleted item stays in the inventory; removing it is up to the caller.
    pub fn use_consumable(
        &mut self,
        item_id: &ItemId,
        effect: &ConsumableEffect,
    ) -> Result<ConsumableUse, ConsumableError> {
        let slot = self
            .inventory
            .iter_mut()
            .find(|item| &item.item_id == item_id)
            .ok_or_else(|| ConsumableError::NotInInventory(item_id.clone()))?;

        if slot.uses == Some(0) {
            return Err(ConsumableError::Depleted(item_id.clone()));
        }
        if let Some(uses) = slot.uses.as_mut() {
            *uses -= 1;
        }
        let depleted = slot.uses == Some(0);

        let healing = effect.healing.map(|amount| self.heal(amount));
        if let Some(stat) = effect.forced_stat {
            self.forced_next_roll = Some(stat);
        }
        if effect.allows_reroll {
            self.potion_reroll_available = true;
        }

        Ok(ConsumableUse {
            item_id: item_id.clone(),
            healing,
            forced_stat: effect.forced_stat,
            allows_reroll: effect.allows_reroll,
            consumes_turn: effect.forced_stat.is_some(),
            depleted,
        })
    }

    /// Append an unlimited copy of `item_id`; the caller sets `uses` from the catalog.
    pub fn add_item(
        &mut self,
        item_id: ItemId,
        capacity: usize,
    ) -> Result<&mut InventoryItem, InventoryFull> {
        if self.inventory.len() >= capacity {
            return Err(InventoryFull { capacity });
        }

        let index = self.inventory.len();
        self.inventory.push(InventoryItem {
            item_id,
            uses: None,
        });
        Ok(&mut self.inventory[index])
    }

    /// Remove the first entry for `item_id`.
    pub fn remove_item(&mut self, item_id: &ItemId) -> bool {
        match self.inventory.iter().position(|item| &item.item_id == item_id) {
            Some(index) => {
                self.inventory.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn holds(&self, item_id: &ItemId) -> bool {
        self.inventory.iter().any(|item| &item.item_id == item_id)
    }

    /// Take the forced stat for the roll being confirmed, clearing it.
    pub fn take_forced_roll(&mut self) -> Option<Stat> {
        self.forced_next_roll.take()
    }

    /// Spend the reroll granted by a potion.
    pub fn spend_reroll(&mut self) -> Result<(), DomainError> {
        if !self.potion_reroll_available {
            return Err(DomainError::invalid_state("no reroll available"));
        }
        self.potion_reroll_available = false;
        Ok(())
    }
}
