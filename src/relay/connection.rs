//! Connection abstraction over the upgraded WebSocket.
//!
//! The outbound half is shared between the connection handler and the
//! relay loop as an [`Arc<dyn Connection>`]; the inbound half stays a
//! plain stream owned exclusively by the handler.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::extract::ws::{Message as WsFrame, WebSocket};
use futures::stream::SplitSink;
use futures::SinkExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::models::Message;

/// Opaque identity of one live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound half of one client connection.
///
/// Jointly owned: the connection handler closes it on read failure, the
/// relay loop writes to it on every broadcast and closes it on write
/// failure. `close` must therefore tolerate being called twice.
#[async_trait]
pub trait Connection: Send + Sync {
    fn id(&self) -> ConnectionId;

    /// Write one message to the client
    async fn send(&self, msg: &Message) -> Result<()>;

    /// Close the connection. Idempotent: the second and later calls are
    /// no-ops that succeed.
    async fn close(&self) -> Result<()>;
}

/// WebSocket-backed connection
pub struct WsConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WebSocket, WsFrame>>,
    closed: AtomicBool,
}

impl WsConnection {
    pub fn new(sink: SplitSink<WebSocket, WsFrame>) -> Self {
        Self {
            id: ConnectionId::new(),
            sink: Mutex::new(sink),
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Connection for WsConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, msg: &Message) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ChatError::ConnectionClosed);
        }

        let json = serde_json::to_string(msg)?;
        let mut sink = self.sink.lock().await;
        sink.send(WsFrame::Text(json))
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let mut sink = self.sink.lock().await;
        sink.close()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))
    }
}

/// Decode one raw WebSocket frame into a handler stream item.
///
/// Text and binary frames must decode as a [`Message`]; ping/pong frames
/// are skipped (axum answers pings itself); a close frame or transport
/// error terminates the stream with an error item.
pub fn decode_frame(
    frame: std::result::Result<WsFrame, axum::Error>,
) -> Option<Result<Message>> {
    match frame {
        Ok(WsFrame::Text(text)) => Some(serde_json::from_str(&text).map_err(ChatError::from)),
        Ok(WsFrame::Binary(data)) => Some(serde_json::from_slice(&data).map_err(ChatError::from)),
        Ok(WsFrame::Close(_)) => Some(Err(ChatError::ConnectionClosed)),
        Ok(WsFrame::Ping(_)) | Ok(WsFrame::Pong(_)) => None,
        Err(e) => Some(Err(ChatError::Transport(e.to_string()))),
    }
}
