use std::time::Duration;

use castlink_core::{ClientMessage, ConnectionId, Resolution, RoomKey, ServerMessage};
use castlink_server::SignalingService;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// A fake client registered directly against the service: an identity plus
/// the receiving end of its outbound channel. Lets tests drive the full
/// message-handling path without a WebSocket in the way.
pub struct TestConn {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl TestConn {
    pub fn connect(service: &SignalingService) -> Self {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        service.add_connection(id, tx);
        Self { id, rx }
    }

    pub async fn create_room(&self, service: &SignalingService, key: &str) {
        service
            .handle_message(self.id, ClientMessage::CreateRoom(RoomKey::from(key)))
            .await;
    }

    pub async fn join_room(&self, service: &SignalingService, key: &str) {
        service
            .handle_message(self.id, ClientMessage::JoinRoom(RoomKey::from(key)))
            .await;
    }

    pub async fn send_signal(
        &self,
        service: &SignalingService,
        to: ConnectionId,
        signal: serde_json::Value,
    ) {
        service
            .handle_message(self.id, ClientMessage::Signal { to, signal })
            .await;
    }

    pub async fn update_resolution(
        &self,
        service: &SignalingService,
        key: &str,
        resolution: Resolution,
    ) {
        service
            .handle_message(
                self.id,
                ClientMessage::UpdateResolution {
                    room_id: RoomKey::from(key),
                    resolution,
                },
            )
            .await;
    }

    /// Simulate the transport reporting this connection closed.
    pub async fn disconnect(self, service: &SignalingService) {
        service.remove_connection(self.id).await;
    }

    /// Next message delivered to this connection; panics after one second.
    pub async fn recv(&mut self) -> ServerMessage {
        timeout(Duration::from_secs(1), self.rx.recv())
            .await
            .expect("timed out waiting for a server message")
            .expect("connection channel closed")
    }

    /// Delivery is synchronous with `handle_message`, so an empty queue
    /// right after an operation means nothing was (or will be) sent.
    pub fn assert_silent(&mut self) {
        if let Ok(msg) = self.rx.try_recv() {
            panic!("expected no message, got {msg:?}");
        }
    }
}
