use donjon_domain::ItemId;
use donjon_shared::ItemAddFailure;

use super::*;
use crate::use_cases::ActionError;

pub(super) async fn handle_use_item(
    state: &WsState,
    binding: &SessionBinding,
    item_id: String,
) -> Option<ServerMessage> {
    let item_id = ItemId::from(item_id);
    let usage = match state
        .app
        .use_cases
        .inventory
        .use_item
        .execute(binding.session_id, &binding.player_id, &item_id)
        .await
    {
        Ok(committed) => committed,
        Err(e) => return Some(action_error_response(&e, "use item")),
    };

    let player_id = usage.player_id.to_string();
    if let Some(hp) = usage.hp_after_healing {
        state.connections.broadcast_to_session(
            binding.session_id,
            ServerMessage::PlayerHpUpdated {
                player_id: player_id.clone(),
                hp,
            },
        );
    }
    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::ItemUsed {
            player_id: player_id.clone(),
            item_id: item_id.to_string(),
            result: usage.effect.clone(),
        },
    );
    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::PlayerInventoryUpdated {
            player_id,
            inventory: usage.inventory.clone(),
        },
    );
    None
}

pub(super) async fn handle_add_item(
    state: &WsState,
    binding: &SessionBinding,
    item_id: String,
    max_inventory_size: Option<u32>,
) -> Option<ServerMessage> {
    let added = match state
        .app
        .use_cases
        .inventory
        .add_item
        .execute(
            binding.session_id,
            &binding.player_id,
            &ItemId::from(item_id.as_str()),
            max_inventory_size.map(|size| size as usize),
        )
        .await
    {
        Ok(committed) => committed,
        Err(ActionError::InventoryFull { capacity }) => {
            tracing::debug!(
                session_id = %binding.session_id,
                player_id = %binding.player_id,
                item_id = %item_id,
                capacity,
                "Item refused, inventory full"
            );
            return Some(ServerMessage::ItemAddFailed {
                item_id,
                reason: ItemAddFailure::InventoryFull,
            });
        }
        Err(e) => return Some(action_error_response(&e, "add item")),
    };

    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::PlayerInventoryUpdated {
            player_id: added.player_id.to_string(),
            inventory: added.inventory.clone(),
        },
    );
    None
}
