use std::sync::Arc;

use castlink_core::{ClientMessage, ConnectionId, ServerMessage};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::registry::RoomRegistry;

struct SignalingInner {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>>,
    registry: RoomRegistry,
}

/// Routes every client operation and owns the per-connection outbound
/// senders. Cheap to clone; all state sits behind the `Arc`.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                connections: DashMap::new(),
                registry: RoomRegistry::new(),
            }),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.inner.registry
    }

    /// Bind a freshly accepted connection to its outbound channel.
    pub fn add_connection(&self, conn: ConnectionId, tx: mpsc::UnboundedSender<ServerMessage>) {
        self.inner.connections.insert(conn, tx);
    }

    /// Tear down a closed connection: unroute it, destroy the rooms it
    /// hosted, and notify the parties that can still be reached.
    pub async fn remove_connection(&self, conn: ConnectionId) {
        self.inner.connections.remove(&conn);

        let cleanup = self.inner.registry.remove_connection(conn).await;

        for (key, members) in cleanup.closed_rooms {
            info!(room = %key, host = %conn, "Host disconnected, closing room");
            for member in members {
                self.send_to(member, ServerMessage::HostDisconnected);
            }
        }

        for host in cleanup.hosts_to_notify {
            self.send_to(host, ServerMessage::ViewerDisconnected(conn));
        }
    }

    /// Process one inbound message. Called sequentially per connection, so
    /// ordering within a single channel is preserved.
    pub async fn handle_message(&self, from: ConnectionId, msg: ClientMessage) {
        match msg {
            ClientMessage::CreateRoom(key) => {
                info!(room = %key, host = %from, "Creating room");
                self.inner.registry.create_or_replace(key, from).await;
            }

            ClientMessage::JoinRoom(key) => match self.inner.registry.try_join(&key, from).await {
                Ok(host) => {
                    info!(room = %key, viewer = %from, "Viewer joined");
                    self.send_to(host, ServerMessage::ViewerJoined(from));
                }
                Err(e) => {
                    debug!(room = %key, viewer = %from, "Join rejected: {e}");
                    self.send_to(from, ServerMessage::Error(e.to_string()));
                }
            },

            ClientMessage::Signal { to, signal } => {
                // Fire-and-forget relay; a stale target drops silently.
                self.send_to(to, ServerMessage::Signal { from, signal });
            }

            ClientMessage::UpdateResolution {
                room_id,
                resolution,
            } => {
                let Some(recipients) = self
                    .inner
                    .registry
                    .update_resolution(&room_id, resolution, from)
                    .await
                else {
                    debug!(room = %room_id, "Resolution update for unknown room, ignoring");
                    return;
                };

                for member in recipients {
                    self.send_to(member, ServerMessage::ResolutionUpdated(resolution));
                }
            }
        }
    }

    /// Deliver `msg` to `to` if it is currently connected. No feedback to
    /// anyone otherwise; the protocol has no delivery guarantee.
    pub fn send_to(&self, to: ConnectionId, msg: ServerMessage) {
        let Some(tx) = self.inner.connections.get(&to) else {
            debug!(target = %to, "Dropping message to disconnected target");
            return;
        };
        if tx.send(msg).is_err() {
            warn!(target = %to, "Outbound channel closed before cleanup ran");
        }
    }
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}
