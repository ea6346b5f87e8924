use axum::Router;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use castlink_core::{ClientMessage, ConnectionId, ServerMessage};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::SignalingService;

/// Build the service router: one WebSocket endpoint, nothing else.
pub fn app(service: SignalingService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(service)
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let conn_id = ConnectionId::new();
    info!("New WebSocket connection: {conn_id}");

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_connection(conn_id, tx);
    service.send_to(conn_id, ServerMessage::Welcome(conn_id));

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to serialize server message: {e}");
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                        // Awaiting here keeps per-connection ordering intact.
                        Ok(client_msg) => service.handle_message(conn_id, client_msg).await,
                        Err(e) => warn!("Invalid message from {conn_id}: {e}"),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_connection(conn_id).await;
    info!("WebSocket disconnected: {conn_id}");
}
