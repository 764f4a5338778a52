//! WebSocket handler for streaming conversation envelopes.
//!
//! `GET /conversation/{id}` upgrades to a WebSocket. The handler attaches
//! an unbounded mpsc channel to the session (last connection wins), sends
//! the `on_connected` envelope, then forwards every envelope the agent
//! emits as a JSON text frame.
//!
//! Disconnecting does **not** cancel a running turn: the session simply
//! loses its channel and the turn finalizes silently. The client can
//! reconnect and poll `GET /message` for the result.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use wayfarer_types::envelope::ConversationEnvelope;

use crate::http::error::AppError;
use crate::state::AppState;

/// Upgrade an HTTP request to a WebSocket attached to one conversation.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    // Reject unknown conversations before upgrading; the client gets a
    // plain 404 instead of an immediately-closed socket.
    let session = state.registry.get(&id)?;
    Ok(ws.on_upgrade(move |socket| handle_ws_connection(socket, id, session)))
}

async fn handle_ws_connection(
    socket: WebSocket,
    id: String,
    session: std::sync::Arc<wayfarer_core::session::Session>,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<ConversationEnvelope>();
    session.attach_channel(tx).await;
    session.emit(ConversationEnvelope::connected()).await;

    loop {
        tokio::select! {
            // --- Branch 1: Forward agent envelopes to the client ---
            envelope = rx.recv() => {
                match envelope {
                    Some(envelope) => {
                        match serde_json::to_string(&envelope) {
                            Ok(json) => {
                                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                                    // Client disconnected
                                    break;
                                }
                            }
                            Err(err) => {
                                tracing::warn!(conversation_id = %id, "failed to serialize envelope: {err}");
                            }
                        }
                    }
                    None => {
                        // A newer connection replaced this channel, or the
                        // session was deleted.
                        break;
                    }
                }
            }

            // --- Branch 2: Watch the client side for disconnect ---
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(conversation_id = %id, "WebSocket receive error: {err}");
                        break;
                    }
                    // The push channel is one-way; inbound text, binary,
                    // ping, pong frames are ignored.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!(conversation_id = %id, "WebSocket connection closed");
}
