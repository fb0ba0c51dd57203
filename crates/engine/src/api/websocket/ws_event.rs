use donjon_shared::GameEndReason;

use super::*;

pub(super) async fn handle_event_choice(
    state: &WsState,
    binding: &SessionBinding,
    choice_id: String,
    stat_check_result: Option<bool>,
    damage: Option<i32>,
) -> Option<ServerMessage> {
    let outcome = match state
        .app
        .use_cases
        .events
        .resolve_choice
        .execute(binding.session_id, &binding.player_id, damage)
        .await
    {
        Ok(committed) => committed,
        Err(e) => return Some(action_error_response(&e, "resolve event choice")),
    };

    let session_id = binding.session_id;
    let player_id = outcome.player_id.to_string();

    if let Some(hp) = outcome.hp {
        state.connections.broadcast_to_session(
            session_id,
            ServerMessage::PlayerHpUpdated {
                player_id: player_id.clone(),
                hp,
            },
        );
    }
    if outcome.player_died {
        state.connections.broadcast_to_session(
            session_id,
            ServerMessage::GameEnded {
                victory: false,
                reason: Some(GameEndReason::PlayerDeath),
                player_id: Some(player_id.clone()),
            },
        );
    }
    state.connections.broadcast_to_session(
        session_id,
        ServerMessage::EventChoiceMade {
            player_id,
            choice_id,
            stat_check_result,
        },
    );

    let finished = outcome.player_died;
    drop(outcome);
    if finished {
        state.release_finished(session_id);
    }
    None
}
