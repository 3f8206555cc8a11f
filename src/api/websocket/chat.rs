//! Chat WebSocket handler
//!
//! Upgrades the request and hands the socket to the relay's connection
//! handler. A failed upgrade is rejected by axum at the HTTP layer and
//! never affects the process or other clients.

use std::sync::Arc;

use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{future, StreamExt};

use crate::api::server::AppState;
use crate::relay::{decode_frame, run_connection, WsConnection};

/// WebSocket handler for the chat relay
pub async fn chat_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_chat_ws(socket, state))
}

/// Drive one upgraded chat connection until the client disconnects or
/// fails
async fn handle_chat_ws(socket: WebSocket, state: AppState) {
    let (sink, stream) = socket.split();
    let conn = Arc::new(WsConnection::new(sink));
    let inbound = stream.filter_map(|frame| future::ready(decode_frame(frame)));

    run_connection(state.registry.clone(), state.relay.clone(), conn, inbound).await;
}
