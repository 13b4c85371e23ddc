//! WebSocket Connection Handler
//!
//! Accepts upgrades on the gateway path, gates them on the handshake
//! credential, and runs the per-connection socket loop. The loop is the
//! single writer on the transport: pushed events, liveness pings and
//! termination all reach the wire through it.

use axum::{
    body::Bytes,
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::gateway::auth::authenticate;
use crate::gateway::registry::{ConnectionEntry, Outbound};
use crate::metrics;
use crate::shared::error::AuthError;
use crate::startup::AppState;

/// WebSocket upgrade handler for the gateway path.
///
/// The credential is checked against the handshake headers before the
/// protocol switch; the verdict rides into the socket task so rejected
/// connections can be closed with a proper status code.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let identity = authenticate(&headers, &state.settings.jwt.secret);

    ws.max_message_size(state.settings.websocket.max_message_size)
        .max_frame_size(state.settings.websocket.max_frame_size)
        .on_upgrade(move |socket| handle_socket(socket, state, identity))
}

/// Run one WebSocket connection to completion.
async fn handle_socket(mut socket: WebSocket, state: AppState, identity: Result<i64, AuthError>) {
    let user_id = match identity {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting gateway connection");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: "policy violation".into(),
                })))
                .await;
            return;
        }
    };

    let session_id = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();

    let entry = Arc::new(ConnectionEntry::new(session_id, user_id, tx));
    state.registry.add(entry.clone());
    metrics::set_active_connections(state.registry.connection_count());

    loop {
        tokio::select! {
            // Frames queued by the dispatcher and the supervisor.
            frame = rx.recv() => {
                match frame {
                    Some(Outbound::Event(payload)) => {
                        if sink.send(Message::Text(payload.into())).await.is_err() {
                            break;
                        }
                    }
                    Some(Outbound::Ping) => {
                        if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                            break;
                        }
                    }
                    Some(Outbound::Terminate) => {
                        tracing::info!(
                            user_id,
                            %session_id,
                            "closing unresponsive connection"
                        );
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                    None => break,
                }
            }

            // Frames arriving from the client.
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Pong(_))) => entry.mark_alive(),
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(user_id, %session_id, "connection closed");
                        break;
                    }
                    Some(Ok(_)) => {
                        // The gateway is push-only; client text/binary
                        // frames are ignored.
                    }
                    Some(Err(e)) => {
                        tracing::debug!(user_id, %session_id, "websocket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    state.registry.remove(user_id, session_id);
    metrics::set_active_connections(state.registry.connection_count());
}
