//! WebSocket session handling and the viewer query protocol.
//!
//! One session per connection, independent of the scrape loop and of other
//! sessions. Every terminal condition — peer close, read error, write
//! failure — converges on deregistration; none propagates upward.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::server::registry::CLIENT_BUFFER;
use crate::server::state::AppState;
use crate::store::SharedElectionStore;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs one viewer session from registration to deregistration.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sink, mut stream) = socket.split();

    // Every frame to this client, pushed or replied, goes through one queue
    // drained by a single writer task.
    let (tx, mut rx) = mpsc::channel::<Message>(CLIENT_BUFFER);
    let client_id = state.registry.register(tx.clone());
    tracing::info!(client = client_id, "New connection");

    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sink.send(frame).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(frame)) = stream.next().await {
        match frame {
            Message::Text(text) => {
                let reply = query_reply(&text, client_id, &state.store);
                if tx.send(Message::Text(reply)).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => {
                tracing::info!(client = client_id, "Closed connection");
                break;
            }
            // Ping/pong control frames are answered by axum itself.
            _ => {}
        }
    }

    state.registry.unregister(client_id);
    drop(tx);
    let _ = writer.await;
}

/// Builds the reply for one viewer message.
///
/// Exactly two commands are recognized, case-sensitively. Anything else gets
/// a rejection string and the connection stays open.
fn query_reply(text: &str, client_id: u64, store: &SharedElectionStore) -> String {
    match text {
        "?" => {
            tracing::info!(client = client_id, "Immediate query received");
            encode_full_state(store)
        }
        "ping" => "pong".to_string(),
        other => {
            tracing::info!(client = client_id, message = %other, "Received unrecognized message");
            "Unrecognized message".to_string()
        }
    }
}

/// Wire-encodes a full copy of the current candidate state.
fn encode_full_state(store: &SharedElectionStore) -> String {
    let snapshot = match store.read() {
        Ok(store) => store.snapshot(),
        Err(_) => {
            tracing::error!("Election store lock poisoned");
            Default::default()
        }
    };

    match serde_json::to_string(&snapshot) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(?e, "Failed to encode state");
            "{}".to_string()
        }
    }
}
