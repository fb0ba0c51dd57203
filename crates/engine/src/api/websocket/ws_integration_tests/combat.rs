use super::*;

use donjon_domain::{DiceRequirement, DiceRoll, Stat};
use donjon_shared::{ErrorCode, GameEndReason};

/// Force pool large enough that no single exchange ends the fight.
fn start_combat(enemy_damage: u32) -> ClientMessage {
    ClientMessage::CombatStarted {
        enemy_id: "squelette".to_string(),
        enemy_damage: Some(enemy_damage),
        player_count: None,
        base_requirements: Some(vec![DiceRequirement::new(Stat::Force, 9)]),
        modifiers: None,
    }
}

async fn open_fight(enemy_damage: u32) -> (tokio::task::JoinHandle<()>, WsClient, WsClient) {
    let (addr, server) = spawn_ws_server(build_test_state(running_session())).await;
    let mut alice_ws = join_as(addr, &alice()).await;
    let mut bob_ws = join_as(addr, &bob()).await;

    ws_send_client(&mut alice_ws, &start_combat(enemy_damage)).await;
    for ws in [&mut alice_ws, &mut bob_ws] {
        let started = ws_expect_message(ws, RECV_TIMEOUT, |m| {
            matches!(m, ServerMessage::CombatStarted { .. })
        })
        .await;
        match started {
            ServerMessage::CombatStarted {
                enemy_id,
                enemy_damage: damage,
                scaled_requirements,
                current_round,
                ..
            } => {
                assert_eq!(enemy_id, "squelette");
                assert_eq!(damage, enemy_damage);
                // One scaled stat per roster player
                assert_eq!(scaled_requirements.len(), 2);
                assert_eq!(current_round, 1);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    (server, alice_ws, bob_ws)
}

#[tokio::test]
async fn when_everyone_confirms_then_next_round_opens() {
    let (server, mut alice_ws, mut bob_ws) = open_fight(2).await;

    ws_send_client(
        &mut alice_ws,
        &ClientMessage::ConfirmRoll {
            roll: DiceRoll::double(Stat::Force),
        },
    )
    .await;
    let confirmed = ws_expect_message(&mut bob_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::RollConfirmed { .. })
    })
    .await;
    match confirmed {
        ServerMessage::RollConfirmed {
            player_id,
            roll_result,
            is_victory,
            current_round,
            ..
        } => {
            assert_eq!(player_id, "alice");
            assert_eq!(roll_result.success_count, 2);
            assert!(roll_result.was_blocked);
            assert!(!is_victory);
            assert_eq!(current_round, 1);
        }
        other => panic!("unexpected message: {other:?}"),
    }
    ws_expect_no_message_matching(&mut bob_ws, QUIET_PERIOD, |m| {
        matches!(m, ServerMessage::AllRollsReady { .. })
    })
    .await;

    ws_send_client(
        &mut bob_ws,
        &ClientMessage::ConfirmRoll {
            roll: DiceRoll::double(Stat::Force),
        },
    )
    .await;
    for ws in [&mut alice_ws, &mut bob_ws] {
        let ready = ws_expect_message(ws, RECV_TIMEOUT, |m| {
            matches!(m, ServerMessage::AllRollsReady { .. })
        })
        .await;
        assert!(matches!(ready, ServerMessage::AllRollsReady { round: 2 }));
    }

    server.abort();
}

#[tokio::test]
async fn second_confirmation_in_a_round_is_refused() {
    let (server, mut alice_ws, _bob_ws) = open_fight(2).await;

    for _ in 0..2 {
        ws_send_client(
            &mut alice_ws,
            &ClientMessage::ConfirmRoll {
                roll: DiceRoll::double(Stat::Force),
            },
        )
        .await;
    }

    let refused = ws_expect_message(&mut alice_ws, RECV_TIMEOUT, |m| {
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
async fn lethal_retaliation_ends_the_game() {
    let (server, mut alice_ws, mut bob_ws) = open_fight(20).await;

    ws_send_client(
        &mut bob_ws,
        &ClientMessage::ConfirmRoll {
            roll: DiceRoll::single(Stat::Intelligence),
        },
    )
    .await;

    let hp = ws_expect_message(&mut alice_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::PlayerHpUpdated { .. })
    })
    .await;
    assert!(matches!(
        hp,
        ServerMessage::PlayerHpUpdated { ref player_id, hp: 0 } if player_id == "bob"
    ));

    let confirmed = ws_recv_server(&mut alice_ws).await;
    assert!(matches!(confirmed, ServerMessage::RollConfirmed { .. }));

    let ended = ws_recv_server(&mut alice_ws).await;
    match ended {
        ServerMessage::GameEnded {
            victory,
            reason,
            player_id,
        } => {
            assert!(!victory);
            assert_eq!(reason, Some(GameEndReason::PlayerDeath));
            assert_eq!(player_id.as_deref(), Some("bob"));
        }
        other => panic!("unexpected message: {other:?}"),
    }

    server.abort();
}

#[tokio::test]
async fn only_the_host_can_force_a_round() {
    let (server, mut alice_ws, mut bob_ws) = open_fight(2).await;

    ws_send_client(&mut bob_ws, &ClientMessage::ForceAdvanceRound).await;
    let refused = ws_expect_message(&mut bob_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::Error { .. })
    })
    .await;
    assert!(matches!(
        refused,
        ServerMessage::Error {
            code: ErrorCode::Forbidden,
            ..
        }
    ));

    ws_send_client(
        &mut alice_ws,
        &ClientMessage::ConfirmRoll {
            roll: DiceRoll::double(Stat::Force),
        },
    )
    .await;
    ws_send_client(&mut alice_ws, &ClientMessage::ForceAdvanceRound).await;

    let skipped = ws_expect_message(&mut bob_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::RoundSkipped { .. })
    })
    .await;
    match skipped {
        ServerMessage::RoundSkipped {
            round,
            skipped_players,
        } => {
            assert_eq!(round, 2);
            assert_eq!(skipped_players, vec!["bob".to_string()]);
        }
        other => panic!("unexpected message: {other:?}"),
    }
    let ready = ws_recv_server(&mut bob_ws).await;
    assert!(matches!(ready, ServerMessage::AllRollsReady { round: 2 }));

    server.abort();
}

#[tokio::test]
async fn dice_rolled_carries_a_preview_during_combat() {
    let (server, mut alice_ws, mut bob_ws) = open_fight(2).await;

    ws_send_client(
        &mut bob_ws,
        &ClientMessage::RollDice {
            roll: DiceRoll::single(Stat::Force),
        },
    )
    .await;

    let rolled = ws_expect_message(&mut alice_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::DiceRolled { .. })
    })
    .await;
    match rolled {
        ServerMessage::DiceRolled {
            player_id,
            roll,
            roll_result,
        } => {
            assert_eq!(player_id, "bob");
            assert_eq!(roll, DiceRoll::single(Stat::Force));
            let preview = roll_result.unwrap();
            assert!(preview.was_successful);
            assert_eq!(preview.damage_taken, 2);
        }
        other => panic!("unexpected message: {other:?}"),
    }

    // A preview never opens the barrier or changes the pool
    ws_send_client(
        &mut bob_ws,
        &ClientMessage::ConfirmRoll {
            roll: DiceRoll::double(Stat::Force),
        },
    )
    .await;
    let confirmed = ws_expect_message(&mut alice_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::RollConfirmed { .. })
    })
    .await;
    assert!(matches!(
        confirmed,
        ServerMessage::RollConfirmed { current_round: 1, .. }
    ));

    server.abort();
}
