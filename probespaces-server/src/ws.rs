//! WebSocket endpoint: one connection, one session binding

use crate::http::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use probespaces_core::protocol::ClientEvent;
use probespaces_core::space::types::ConnectionId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

/// Drive one WebSocket connection from accept to teardown
///
/// Connection loss is handled identically to an explicit leave: whatever ends
/// the read loop, the connection is detached from its space before the hub
/// entry is dropped.
async fn handle_connection(socket: WebSocket, state: AppState) {
    let connection = ConnectionId::generate();
    info!("Client connected: {}", connection);

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    state.hub.register(connection, out_tx);

    // Writer task: drain the outbound queue into the socket.
    let writer = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if ws_tx.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });

    while let Some(message) = ws_rx.next().await {
        match message {
            Ok(Message::Text(text)) => handle_frame(&state, connection, &text).await,
            Ok(Message::Binary(data)) => {
                warn!(
                    "Unexpected binary frame from {} ({} bytes)",
                    connection,
                    data.len()
                );
            }
            // Pongs are generated by the websocket layer itself.
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                debug!("Client {} sent close", connection);
                break;
            }
            Err(e) => {
                warn!("WebSocket error for {}: {}", connection, e);
                break;
            }
        }
    }

    state.coordinator.leave(connection).await;
    state.hub.unregister(connection);
    writer.abort();
    info!("Client disconnected: {}", connection);
}

/// Parse and dispatch one inbound frame
///
/// Malformed payloads are discarded before any state is touched.
async fn handle_frame(state: &AppState, connection: ConnectionId, text: &str) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            warn!("Discarding malformed frame from {}: {}", connection, e);
            return;
        }
    };

    if let Some(reply) = state.coordinator.handle_event(connection, event).await {
        state.hub.send_to(connection, &reply);
    }
}
