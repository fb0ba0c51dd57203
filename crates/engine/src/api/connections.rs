//! Connection registry for WebSocket clients.
//!
//! Tracks every open socket, which session/player it joined, and the channel
//! used to push server messages to it. Broadcasts never block: a full or
//! closed channel is logged and skipped.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::mpsc;

use donjon_domain::{ConnectionId, PlayerId, SessionId};
use donjon_shared::ServerMessage;

/// Session/player a connection acts as after `JoinRoom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBinding {
    pub session_id: SessionId,
    pub player_id: PlayerId,
}

struct ConnectionEntry {
    binding: Option<SessionBinding>,
    sender: mpsc::Sender<ServerMessage>,
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Connection {0} is not registered")]
    NotRegistered(ConnectionId),
    #[error("Outbound channel for connection {0} is full or closed")]
    ChannelUnavailable(ConnectionId),
}

#[derive(Default)]
pub struct ConnectionManager {
    connections: DashMap<ConnectionId, ConnectionEntry>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a socket. Dropping the returned guard unregisters it.
    pub fn register(
        self: &Arc<Self>,
        connection_id: ConnectionId,
        sender: mpsc::Sender<ServerMessage>,
    ) -> ConnectionGuard {
        self.connections.insert(
            connection_id,
            ConnectionEntry {
                binding: None,
                sender,
            },
        );
        tracing::debug!(connection_id = %connection_id, "Connection registered");

        ConnectionGuard {
            manager: Arc::clone(self),
            connection_id,
        }
    }

    /// Bind a connection to a session player, returning the previous binding.
    pub fn bind(
        &self,
        connection_id: ConnectionId,
        binding: SessionBinding,
    ) -> Result<Option<SessionBinding>, ConnectionError> {
        let mut entry = self
            .connections
            .get_mut(&connection_id)
            .ok_or(ConnectionError::NotRegistered(connection_id))?;
        Ok(entry.binding.replace(binding))
    }

    pub fn unbind(&self, connection_id: ConnectionId) -> Option<SessionBinding> {
        self.connections
            .get_mut(&connection_id)
            .and_then(|mut entry| entry.binding.take())
    }

    pub fn binding(&self, connection_id: ConnectionId) -> Option<SessionBinding> {
        self.connections
            .get(&connection_id)
            .and_then(|entry| entry.binding.clone())
    }

    pub fn send_to(
        &self,
        connection_id: ConnectionId,
        message: ServerMessage,
    ) -> Result<(), ConnectionError> {
        let entry = self
            .connections
            .get(&connection_id)
            .ok_or(ConnectionError::NotRegistered(connection_id))?;
        entry
            .sender
            .try_send(message)
            .map_err(|_| ConnectionError::ChannelUnavailable(connection_id))
    }

    /// Queue a message to every connection joined to the session.
    pub fn broadcast_to_session(&self, session_id: SessionId, message: ServerMessage) {
        self.broadcast(session_id, None, message);
    }

    /// Queue a message to every connection of the session except `except`.
    pub fn broadcast_to_session_except(
        &self,
        session_id: SessionId,
        except: ConnectionId,
        message: ServerMessage,
    ) {
        self.broadcast(session_id, Some(except), message);
    }

    fn broadcast(&self, session_id: SessionId, except: Option<ConnectionId>, message: ServerMessage) {
        for entry in self.connections.iter() {
            let connection_id = *entry.key();
            if Some(connection_id) == except {
                continue;
            }
            let joined = entry
                .binding
                .as_ref()
                .is_some_and(|binding| binding.session_id == session_id);
            if !joined {
                continue;
            }
            if let Err(e) = entry.sender.try_send(message.clone()) {
                tracing::warn!(
                    connection_id = %connection_id,
                    session_id = %session_id,
                    error = %e,
                    "Failed to queue broadcast"
                );
            }
        }
    }

    /// Number of connections joined to the session.
    pub fn session_connection_count(&self, session_id: SessionId) -> usize {
        self.connections
            .iter()
            .filter(|entry| {
                entry
                    .binding
                    .as_ref()
                    .is_some_and(|binding| binding.session_id == session_id)
            })
            .count()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    fn unregister(&self, connection_id: ConnectionId) {
        let Some((_, entry)) = self.connections.remove(&connection_id) else {
            return;
        };
        tracing::debug!(connection_id = %connection_id, "Connection unregistered");

        if let Some(binding) = entry.binding {
            self.broadcast_to_session(
                binding.session_id,
                ServerMessage::PlayerDisconnected {
                    player_id: binding.player_id.to_string(),
                },
            );
        }
    }
}

/// Keeps a connection registered for as long as it lives.
///
/// Dropping it removes the connection and, if it had joined a session, tells
/// the rest of the room the player disconnected.
pub struct ConnectionGuard {
    manager: Arc<ConnectionManager>,
    connection_id: ConnectionId,
}

impl ConnectionGuard {
    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.manager.unregister(self.connection_id);
    }
}
