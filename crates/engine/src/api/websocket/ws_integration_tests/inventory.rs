use super::*;

use donjon_shared::ItemAddFailure;

fn add(item_id: &str) -> ClientMessage {
    ClientMessage::AddItem {
        item_id: item_id.to_string(),
        max_inventory_size: None,
    }
}

#[tokio::test]
async fn full_inventory_is_reported_to_the_requester_only() {
    let (addr, server) = spawn_ws_server(build_test_state(running_session())).await;
    let mut alice_ws = join_as(addr, &alice()).await;
    let mut bob_ws = join_as(addr, &bob()).await;

    for item in ["potion_soin", "amulette"] {
        ws_send_client(&mut bob_ws, &add(item)).await;
        ws_expect_message(&mut alice_ws, RECV_TIMEOUT, |m| {
            matches!(m, ServerMessage::PlayerInventoryUpdated { .. })
        })
        .await;
    }

    ws_send_client(&mut bob_ws, &add("epee_courte")).await;
    let failed = ws_expect_message(&mut bob_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::ItemAddFailed { .. })
    })
    .await;
    match failed {
        ServerMessage::ItemAddFailed { item_id, reason } => {
            assert_eq!(item_id, "epee_courte");
            assert_eq!(reason, ItemAddFailure::InventoryFull);
        }
        other => panic!("unexpected message: {other:?}"),
    }
    ws_expect_no_message_matching(&mut alice_ws, QUIET_PERIOD, |m| {
        matches!(
            m,
            ServerMessage::ItemAddFailed { .. } | ServerMessage::PlayerInventoryUpdated { .. }
        )
    })
    .await;

    server.abort();
}

#[tokio::test]
async fn healing_potion_updates_hp_then_inventory() {
    let mut session = running_session();
    {
        let state = session.player_state_mut(&bob()).unwrap();
        state.current_hp = 3;
        state
            .add_item(donjon_domain::ItemId::from("potion_soin"), 2)
            .unwrap()
            .uses = Some(1);
    }
    let (addr, server) = spawn_ws_server(build_test_state(session)).await;
    let mut alice_ws = join_as(addr, &alice()).await;
    let mut bob_ws = join_as(addr, &bob()).await;

    ws_send_client(
        &mut bob_ws,
        &ClientMessage::UseItem {
            item_id: "potion_soin".to_string(),
        },
    )
    .await;

    let hp = ws_expect_message(&mut alice_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::PlayerHpUpdated { .. })
    })
    .await;
    assert!(matches!(hp, ServerMessage::PlayerHpUpdated { hp: 8, .. }));

    match ws_recv_server(&mut alice_ws).await {
        ServerMessage::ItemUsed {
            player_id,
            item_id,
            result,
        } => {
            assert_eq!(player_id, "bob");
            assert_eq!(item_id, "potion_soin");
            assert_eq!(result.healing, Some(5));
            assert!(result.depleted);
        }
        other => panic!("unexpected message: {other:?}"),
    }
    match ws_recv_server(&mut alice_ws).await {
        ServerMessage::PlayerInventoryUpdated { inventory, .. } => assert!(inventory.is_empty()),
        other => panic!("unexpected message: {other:?}"),
    }

    server.abort();
}

#[tokio::test]
async fn using_an_item_not_carried_fails() {
    let (addr, server) = spawn_ws_server(build_test_state(running_session())).await;
    let mut bob_ws = join_as(addr, &bob()).await;

    ws_send_client(
        &mut bob_ws,
        &ClientMessage::UseItem {
            item_id: "potion_soin".to_string(),
        },
    )
    .await;

    let msg = ws_recv_server(&mut bob_ws).await;
    assert!(matches!(msg, ServerMessage::Error { .. }));

    server.abort();
}
