use super::*;

use donjon_shared::ErrorCode;

#[tokio::test]
async fn game_message_before_join_is_rejected() {
    let (addr, server) = spawn_ws_server(build_test_state(waiting_session())).await;
    let mut ws = ws_connect(addr).await;

    ws_send_client(&mut ws, &ClientMessage::StartGame).await;

    let msg = ws_recv_server(&mut ws).await;
    assert!(matches!(
        msg,
        ServerMessage::Error {
            code: ErrorCode::NotJoined,
            ..
        }
    ));

    server.abort();
}

#[tokio::test]
async fn heartbeat_works_without_joining() {
    let (addr, server) = spawn_ws_server(build_test_state(waiting_session())).await;
    let mut ws = ws_connect(addr).await;

    ws_send_client(&mut ws, &ClientMessage::Heartbeat).await;
    assert!(matches!(ws_recv_server(&mut ws).await, ServerMessage::Pong));

    server.abort();
}

#[tokio::test]
async fn stranger_cannot_join() {
    let (addr, server) = spawn_ws_server(build_test_state(waiting_session())).await;
    let mut ws = ws_connect(addr).await;

    ws_send_client(
        &mut ws,
        &ClientMessage::JoinRoom {
            session_id: session_id().to_uuid(),
            player_id: "mallory".to_string(),
            display_name: None,
        },
    )
    .await;

    let msg = ws_recv_server(&mut ws).await;
    assert!(matches!(
        msg,
        ServerMessage::Error {
            code: ErrorCode::NotFound,
            ..
        }
    ));

    server.abort();
}

#[tokio::test]
async fn when_bob_joins_then_alice_sees_him_and_bob_gets_snapshot() {
    let (addr, server) = spawn_ws_server(build_test_state(waiting_session())).await;
    let mut alice_ws = join_as(addr, &alice()).await;

    let mut bob_ws = ws_connect(addr).await;
    ws_send_client(
        &mut bob_ws,
        &ClientMessage::JoinRoom {
            session_id: session_id().to_uuid(),
            player_id: "bob".to_string(),
            display_name: Some("Bob".to_string()),
        },
    )
    .await;

    match ws_recv_server(&mut bob_ws).await {
        ServerMessage::SessionState {
            session_id: sid,
            player_ids,
            status,
            ..
        } => {
            assert_eq!(sid, session_id().to_uuid());
            assert_eq!(player_ids, vec!["alice".to_string(), "bob".to_string()]);
            assert_eq!(status, donjon_domain::SessionStatus::Waiting);
        }
        other => panic!("unexpected message: {other:?}"),
    }

    let joined = ws_expect_message(&mut alice_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::PlayerJoined { .. })
    })
    .await;
    match joined {
        ServerMessage::PlayerJoined {
            player_id,
            display_name,
        } => {
            assert_eq!(player_id, "bob");
            assert_eq!(display_name.as_deref(), Some("Bob"));
        }
        other => panic!("unexpected message: {other:?}"),
    }

    server.abort();
}

#[tokio::test]
async fn when_players_pick_characters_and_start_then_both_get_the_same_adventure() {
    let (addr, server) = spawn_ws_server(build_test_state(waiting_session())).await;
    let mut alice_ws = join_as(addr, &alice()).await;
    let mut bob_ws = join_as(addr, &bob()).await;

    ws_send_client(
        &mut alice_ws,
        &ClientMessage::SelectCharacter {
            character_id: "chevalier".to_string(),
            max_hp: 10,
        },
    )
    .await;
    let selected = ws_expect_message(&mut bob_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::CharacterSelected { .. })
    })
    .await;
    assert!(matches!(
        selected,
        ServerMessage::CharacterSelected { current_hp: 10, max_hp: 10, .. }
    ));

    ws_send_client(&mut bob_ws, &ClientMessage::StartGame).await;

    let mut starts = Vec::new();
    for ws in [&mut alice_ws, &mut bob_ws] {
        let msg = ws_expect_message(ws, RECV_TIMEOUT, |m| {
            matches!(m, ServerMessage::GameStarted { .. })
        })
        .await;
        match msg {
            ServerMessage::GameStarted {
                adventure_id,
                adventure_seed,
                randomized_adventure,
                starting_item_id,
                game_state,
            } => {
                assert_eq!(adventure_id, "crypte");
                assert_eq!(randomized_adventure.event_ids.len(), 8);
                assert!(starting_item_id.is_some());
                assert_eq!(game_state.current_event_index, 0);
                starts.push((adventure_seed, randomized_adventure));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
    assert_eq!(starts[0], starts[1]);

    server.abort();
}

#[tokio::test]
async fn starting_twice_replays_only_to_the_asker() {
    let (addr, server) = spawn_ws_server(build_test_state(running_session())).await;
    let mut alice_ws = join_as(addr, &alice()).await;
    let mut bob_ws = join_as(addr, &bob()).await;

    ws_send_client(&mut alice_ws, &ClientMessage::StartGame).await;
    for ws in [&mut alice_ws, &mut bob_ws] {
        ws_expect_message(ws, RECV_TIMEOUT, |m| {
            matches!(m, ServerMessage::GameStarted { .. })
        })
        .await;
    }

    ws_send_client(&mut alice_ws, &ClientMessage::StartGame).await;
    ws_expect_message(&mut alice_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::GameStarted { .. })
    })
    .await;
    ws_expect_no_message_matching(&mut bob_ws, QUIET_PERIOD, |m| {
        matches!(m, ServerMessage::GameStarted { .. })
    })
    .await;

    server.abort();
}

#[tokio::test]
async fn next_event_and_game_over_are_broadcast() {
    let (addr, server) = spawn_ws_server(build_test_state(running_session())).await;
    let mut alice_ws = join_as(addr, &alice()).await;
    let mut bob_ws = join_as(addr, &bob()).await;

    ws_send_client(&mut alice_ws, &ClientMessage::NextEvent).await;
    let changed = ws_expect_message(&mut bob_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::EventChanged { .. })
    })
    .await;
    assert!(matches!(
        changed,
        ServerMessage::EventChanged {
            current_event_index: 1
        }
    ));

    ws_send_client(&mut bob_ws, &ClientMessage::GameOver { victory: true }).await;
    let ended = ws_expect_message(&mut alice_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::GameEnded { .. })
    })
    .await;
    assert!(matches!(
        ended,
        ServerMessage::GameEnded {
            victory: true,
            reason: None,
            ..
        }
    ));

    ws_send_client(&mut bob_ws, &ClientMessage::GameOver { victory: false }).await;
    let refused = ws_expect_message(&mut bob_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::Error { .. })
    })
    .await;
    assert!(matches!(
        refused,
        ServerMessage::Error {
            code: ErrorCode::Conflict,
            ..
        }
    ));

    server.abort();
}

#[tokio::test]
async fn leaving_and_disconnecting_are_announced() {
    let (addr, server) = spawn_ws_server(build_test_state(running_session())).await;
    let mut alice_ws = join_as(addr, &alice()).await;
    let mut bob_ws = join_as(addr, &bob()).await;

    ws_send_client(&mut bob_ws, &ClientMessage::LeaveRoom).await;
    let left = ws_expect_message(&mut alice_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::PlayerLeft { .. })
    })
    .await;
    assert!(matches!(left, ServerMessage::PlayerLeft { player_id } if player_id == "bob"));

    let mut bob_ws = join_as(addr, &bob()).await;
    bob_ws.close(None).await.unwrap();

    let gone = ws_expect_message(&mut alice_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::PlayerDisconnected { .. })
    })
    .await;
    assert!(matches!(
        gone,
        ServerMessage::PlayerDisconnected { player_id } if player_id == "bob"
    ));

    server.abort();
}

#[tokio::test]
async fn chat_is_relayed_with_sender_and_time() {
    let (addr, server) = spawn_ws_server(build_test_state(running_session())).await;
    let mut alice_ws = join_as(addr, &alice()).await;
    let mut bob_ws = join_as(addr, &bob()).await;

    ws_send_client(
        &mut alice_ws,
        &ClientMessage::Chat {
            message: "  on y va  ".to_string(),
        },
    )
    .await;

    let chat = ws_expect_message(&mut bob_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::ChatMessage { .. })
    })
    .await;
    match chat {
        ServerMessage::ChatMessage {
            player_id,
            message,
            timestamp,
        } => {
            assert_eq!(player_id, "alice");
            assert_eq!(message, "on y va");
            assert_eq!(timestamp, now().timestamp_millis());
        }
        other => panic!("unexpected message: {other:?}"),
    }

    server.abort();
}
