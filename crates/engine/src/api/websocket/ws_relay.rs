//! Messages the engine only forwards to the room. No session state changes.

use super::*;

pub(super) fn handle_next_turn(
    state: &WsState,
    binding: &SessionBinding,
    next_player_id: String,
) -> Option<ServerMessage> {
    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::TurnChanged {
            current_player_id: next_player_id,
        },
    );
    None
}

pub(super) fn handle_chat(
    state: &WsState,
    binding: &SessionBinding,
    message: String,
) -> Option<ServerMessage> {
    let message = message.trim();
    if message.is_empty() {
        return Some(ServerMessage::error(
            ErrorCode::BadRequest,
            "Chat message cannot be empty",
        ));
    }

    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::ChatMessage {
            player_id: binding.player_id.to_string(),
            message: message.to_string(),
            timestamp: state.app.clock.now().timestamp_millis(),
        },
    );
    None
}

pub(super) fn handle_vote_event_opener(
    state: &WsState,
    binding: &SessionBinding,
    voted_for_id: String,
) -> Option<ServerMessage> {
    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::EventOpenerVoted {
            voter_id: binding.player_id.to_string(),
            voted_for_id,
        },
    );
    None
}

pub(super) fn handle_select_event_opener(
    state: &WsState,
    binding: &SessionBinding,
    player_id: String,
) -> Option<ServerMessage> {
    state.connections.broadcast_to_session(
        binding.session_id,
        ServerMessage::EventOpenerSelected { player_id },
    );
    None
}
