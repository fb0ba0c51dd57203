//! WebSocket handling for game clients.
//!
//! One socket per player. `JoinRoom` binds the connection to a session player;
//! every later message acts on that binding. Handlers broadcast while the
//! session lock is still held, so each client sees one action's events before
//! the next action's.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

mod ws_combat;
mod ws_event;
mod ws_inventory;
mod ws_relay;
mod ws_session;

pub mod error_sanitizer;
pub mod round_sweeper;

use donjon_domain::{ConnectionId, PlayerId, SessionId};
use donjon_shared::{ClientMessage, ErrorCode, ServerMessage};

use super::connections::{ConnectionManager, SessionBinding};
use crate::app::App;
use error_sanitizer::action_error_response;

/// Buffer size for per-connection message channel.
const CONNECTION_CHANNEL_BUFFER: usize = 256;

/// Combined state for WebSocket handlers.
pub struct WsState {
    pub app: Arc<App>,
    pub connections: Arc<ConnectionManager>,
}

impl WsState {
    pub fn new(app: Arc<App>, connections: Arc<ConnectionManager>) -> Self {
        Self { app, connections }
    }

    /// Drop the lock entry of a session that can no longer change.
    fn release_finished(&self, session_id: SessionId) {
        if self.app.locks.forget(session_id) {
            tracing::debug!(session_id = %session_id, "Released lock of finished session");
        }
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let connection_id = ConnectionId::new();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(CONNECTION_CHANNEL_BUFFER);

    // Unregisters (and announces the disconnect) on every exit path
    let guard = state.connections.register(connection_id, tx.clone());

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::error!(error = %e, "Failed to serialize server message"),
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(msg) => {
                    if let Some(response) = handle_message(msg, &state, connection_id).await {
                        if tx.try_send(response).is_err() {
                            tracing::warn!(
                                connection_id = %connection_id,
                                "Failed to send response, channel full or closed"
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, error = %e, "Failed to parse message");
                    let error = ServerMessage::error(
                        ErrorCode::ParseError,
                        format!("Invalid message format: {}", e),
                    );
                    let _ = tx.try_send(error);
                }
            },
            Ok(Message::Ping(_)) => {
                let _ = tx.try_send(ServerMessage::Pong);
            }
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::error!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    drop(guard);
    send_task.abort();

    tracing::info!(connection_id = %connection_id, "WebSocket connection terminated");
}

/// Dispatch a parsed client message to the appropriate handler.
///
/// The returned message goes to the requester only.
async fn handle_message(
    msg: ClientMessage,
    state: &WsState,
    connection_id: ConnectionId,
) -> Option<ServerMessage> {
    tracing::debug!(connection_id = %connection_id, kind = msg.kind(), "Client message");

    match msg {
        ClientMessage::Heartbeat => Some(ServerMessage::Pong),
        ClientMessage::Unknown => Some(ServerMessage::error(
            ErrorCode::BadRequest,
            "Unknown message type",
        )),
        ClientMessage::JoinRoom {
            session_id,
            player_id,
            display_name,
        } => {
            ws_session::handle_join_room(
                state,
                connection_id,
                SessionId::from_uuid(session_id),
                PlayerId::from(player_id),
                display_name,
            )
            .await
        }
        other => {
            let Some(binding) = state.connections.binding(connection_id) else {
                return Some(ServerMessage::error(
                    ErrorCode::NotJoined,
                    "Join a session before sending game messages",
                ));
            };
            handle_bound_message(other, state, connection_id, binding).await
        }
    }
}

async fn handle_bound_message(
    msg: ClientMessage,
    state: &WsState,
    connection_id: ConnectionId,
    binding: SessionBinding,
) -> Option<ServerMessage> {
    match msg {
        // Session lifecycle
        ClientMessage::LeaveRoom => ws_session::handle_leave_room(state, connection_id),
        ClientMessage::SelectCharacter {
            character_id,
            max_hp,
        } => ws_session::handle_select_character(state, &binding, character_id, max_hp).await,
        ClientMessage::StartGame => {
            ws_session::handle_start_game(state, connection_id, &binding).await
        }
        ClientMessage::NextEvent => ws_session::handle_next_event(state, &binding).await,
        ClientMessage::GameOver { victory } => {
            ws_session::handle_game_over(state, &binding, victory).await
        }

        // Combat
        ClientMessage::RollDice { roll } => ws_combat::handle_roll_dice(state, &binding, roll).await,
        ClientMessage::ConfirmRoll { roll } => {
            ws_combat::handle_confirm_roll(state, &binding, roll).await
        }
        ClientMessage::CombatStarted {
            enemy_id,
            enemy_damage,
            player_count,
            base_requirements,
            modifiers,
        } => {
            ws_combat::handle_combat_started(
                state,
                &binding,
                ws_combat::combat_request(
                    enemy_id,
                    enemy_damage,
                    player_count,
                    base_requirements,
                    modifiers,
                ),
            )
            .await
        }
        ClientMessage::ForceAdvanceRound => {
            ws_combat::handle_force_advance_round(state, &binding).await
        }

        // Inventory
        ClientMessage::UseItem { item_id } => {
            ws_inventory::handle_use_item(state, &binding, item_id).await
        }
        ClientMessage::AddItem {
            item_id,
            max_inventory_size,
        } => ws_inventory::handle_add_item(state, &binding, item_id, max_inventory_size).await,

        // Events
        ClientMessage::EventChoice {
            choice_id,
            stat_check_result,
            damage,
        } => {
            ws_event::handle_event_choice(state, &binding, choice_id, stat_check_result, damage)
                .await
        }

        // Relays
        ClientMessage::NextTurn { next_player_id } => {
            ws_relay::handle_next_turn(state, &binding, next_player_id)
        }
        ClientMessage::Chat { message } => ws_relay::handle_chat(state, &binding, message),
        ClientMessage::VoteEventOpener { voted_for_id } => {
            ws_relay::handle_vote_event_opener(state, &binding, voted_for_id)
        }
        ClientMessage::SelectEventOpener { player_id } => {
            ws_relay::handle_select_event_opener(state, &binding, player_id)
        }

        // Handled before a binding is required
        ClientMessage::JoinRoom { .. } | ClientMessage::Heartbeat | ClientMessage::Unknown => None,
    }
}

#[cfg(test)]
mod test_support;
