use donjon_domain::CharacterId;

use super::*;

pub(super) async fn handle_join_room(
    state: &WsState,
    connection_id: ConnectionId,
    session_id: SessionId,
    player_id: PlayerId,
    display_name: Option<String>,
) -> Option<ServerMessage> {
    let committed = match state
        .app
        .use_cases
        .session
        .join
        .execute(session_id, &player_id)
        .await
    {
        Ok(committed) => committed,
        Err(e) => return Some(action_error_response(&e, "join session")),
    };

    let binding = SessionBinding {
        session_id,
        player_id: player_id.clone(),
    };
    match state.connections.bind(connection_id, binding.clone()) {
        Ok(Some(previous)) if previous != binding => {
            state.connections.broadcast_to_session(
                previous.session_id,
                ServerMessage::PlayerLeft {
                    player_id: previous.player_id.to_string(),
                },
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(connection_id = %connection_id, error = %e, "Join on a dropped connection");
            return None;
        }
    }

    tracing::info!(
        connection_id = %connection_id,
        session_id = %session_id,
        player_id = %player_id,
        "Player joined session"
    );

    state.connections.broadcast_to_session_except(
        session_id,
        connection_id,
        ServerMessage::PlayerJoined {
            player_id: player_id.to_string(),
            display_name,
        },
    );

    let session = committed.outcome();
    let snapshot = ServerMessage::SessionState {
        session_id: session.id.to_uuid(),
        player_ids: session.player_ids.iter().map(ToString::to_string).collect(),
        status: session.status,
        game_state: session.game_state.clone(),
    };
    if let Err(e) = state.connections.send_to(connection_id, snapshot) {
        tracing::warn!(connection_id = %connection_id, error = %e, "Failed to send session state");
    }
    None
}

pub(super) fn handle_leave_room(state: &WsState, connection_id: ConnectionId) -> Option<ServerMessage> {
    let binding = state.connections.unbind(connection_id)?;

    tracing::info!(
        connection_id = %connection_id,
        session_id = %binding.session_id,
        player_id = %binding.player_id,
        "Player left session"
    );

    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::PlayerLeft {
            player_id: binding.player_id.to_string(),
        },
    );
    None
}

pub(super) async fn handle_select_character(
    state: &WsState,
    binding: &SessionBinding,
    character_id: String,
    max_hp: u32,
) -> Option<ServerMessage> {
    let selection = match state
        .app
        .use_cases
        .session
        .select_character
        .execute(
            binding.session_id,
            &binding.player_id,
            CharacterId::from(character_id),
            max_hp,
        )
        .await
    {
        Ok(committed) => committed,
        Err(e) => return Some(action_error_response(&e, "select character")),
    };

    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::CharacterSelected {
            player_id: selection.player_id.to_string(),
            character_id: selection.character_id.to_string(),
            current_hp: selection.current_hp,
            max_hp: selection.max_hp,
        },
    );
    None
}

pub(super) async fn handle_start_game(
    state: &WsState,
    connection_id: ConnectionId,
    binding: &SessionBinding,
) -> Option<ServerMessage> {
    let start = match state
        .app
        .use_cases
        .session
        .start_game
        .execute(binding.session_id, &binding.player_id)
        .await
    {
        Ok(committed) => committed,
        Err(e) => return Some(action_error_response(&e, "start game")),
    };

    let message = ServerMessage::GameStarted {
        adventure_id: start.adventure_id.to_string(),
        adventure_seed: start.adventure_seed.value(),
        randomized_adventure: start.randomized_adventure.clone(),
        starting_item_id: start.starting_item_id.as_ref().map(ToString::to_string),
        game_state: start.game_state.clone(),
    };

    if start.newly_started {
        state
            .connections
            .broadcast_to_session(binding.session_id, message);
    } else if let Err(e) = state.connections.send_to(connection_id, message) {
        // Already running: only the asker needs the stored start again
        tracing::warn!(connection_id = %connection_id, error = %e, "Failed to replay game start");
    }
    None
}

pub(super) async fn handle_next_event(
    state: &WsState,
    binding: &SessionBinding,
) -> Option<ServerMessage> {
    let index = match state
        .app
        .use_cases
        .session
        .advance_event
        .execute(binding.session_id, &binding.player_id)
        .await
    {
        Ok(committed) => committed,
        Err(e) => return Some(action_error_response(&e, "advance event")),
    };

    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::EventChanged {
            current_event_index: *index,
        },
    );
    None
}

pub(super) async fn handle_game_over(
    state: &WsState,
    binding: &SessionBinding,
    victory: bool,
) -> Option<ServerMessage> {
    let ended = match state
        .app
        .use_cases
        .session
        .end_game
        .execute(binding.session_id, &binding.player_id, victory)
        .await
    {
        Ok(committed) => committed,
        Err(e) => return Some(action_error_response(&e, "end game")),
    };

    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::GameEnded {
            victory: *ended,
            reason: None,
            player_id: None,
        },
    );

    drop(ended);
    state.release_finished(binding.session_id);
    None
}
