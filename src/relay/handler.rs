//! Per-connection read loop.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::Message;

use super::broadcaster::{Envelope, RelayHandle};
use super::connection::Connection;
use super::registry::ConnectionRegistry;

/// Drive one client connection for its whole lifetime.
///
/// Registers the connection before reading anything, then pumps decoded
/// messages into the relay queue until the client disconnects or produces
/// an undecodable payload or a transport error. Every failure is local
/// recovery: the handler unregisters its own connection, closes it, and
/// returns without affecting any other client.
pub async fn run_connection<S>(
    registry: Arc<ConnectionRegistry>,
    relay: RelayHandle,
    conn: Arc<dyn Connection>,
    mut inbound: S,
) where
    S: Stream<Item = Result<Message>> + Unpin,
{
    let id = conn.id();
    registry.register(conn.clone());
    info!(connection = %id, "Client connected");

    while let Some(item) = inbound.next().await {
        match item {
            Ok(message) => {
                if relay.submit(Envelope { origin: id, message }).await.is_err() {
                    debug!(connection = %id, "Relay queue closed, dropping connection");
                    break;
                }
            }
            Err(e) => {
                debug!(connection = %id, "Read failed: {}", e);
                break;
            }
        }
    }

    registry.unregister(id);
    if let Err(e) = conn.close().await {
        debug!(connection = %id, "Close failed: {}", e);
    }
    info!(connection = %id, "Client disconnected");
}
