//! Inbound message queue and the relay loop.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::config::RelayConfig;
use crate::error::{ChatError, Result};
use crate::models::Message;

use super::connection::{Connection, ConnectionId};
use super::registry::ConnectionRegistry;

/// One queued message together with the connection that produced it
#[derive(Debug, Clone)]
pub struct Envelope {
    pub origin: ConnectionId,
    pub message: Message,
}

/// Producer side of the inbound queue, one clone per connection handler
#[derive(Clone)]
pub struct RelayHandle {
    queue: mpsc::Sender<Envelope>,
}

impl RelayHandle {
    /// Enqueue a message for broadcast.
    ///
    /// Waits for queue space when the queue is full; fails only once the
    /// relay loop has stopped.
    pub async fn submit(&self, envelope: Envelope) -> Result<()> {
        self.queue
            .send(envelope)
            .await
            .map_err(|_| ChatError::Internal("relay queue closed".into()))
    }
}

/// The process-wide relay loop.
///
/// Drains the inbound queue in FIFO order and fans each message out to
/// the registry membership captured at the start of the round. A failing
/// recipient is closed and unregistered without aborting delivery to the
/// rest; the next message is not dequeued until every recipient in the
/// round has been attempted.
pub struct RelayService {
    registry: Arc<ConnectionRegistry>,
    config: RelayConfig,
    queue: mpsc::Receiver<Envelope>,
}

impl RelayService {
    /// Create the relay loop and the handle its producers will use
    pub fn new(registry: Arc<ConnectionRegistry>, config: RelayConfig) -> (Self, RelayHandle) {
        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let service = Self {
            registry,
            config,
            queue: rx,
        };
        (service, RelayHandle { queue: tx })
    }

    /// Run the relay loop until shutdown is signalled or every producer
    /// handle has been dropped
    #[instrument(skip(self, shutdown))]
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Relay loop started");

        loop {
            tokio::select! {
                next = self.queue.recv() => {
                    match next {
                        Some(envelope) => self.broadcast(envelope).await,
                        None => {
                            debug!("All relay handles dropped");
                            break;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    // A dropped sender also means shutdown.
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Relay loop shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Deliver one message to every connection in the current registry
    /// snapshot: one relay round.
    async fn broadcast(&self, envelope: Envelope) {
        let recipients = self.registry.snapshot();

        for conn in recipients {
            if !self.config.self_echo && conn.id() == envelope.origin {
                continue;
            }

            let result = match timeout(self.config.write_timeout(), conn.send(&envelope.message))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(ChatError::SendTimeout),
            };

            if let Err(e) = result {
                warn!(connection = %conn.id(), "Dropping recipient after failed write: {}", e);
                self.drop_connection(conn.as_ref()).await;
            }
        }
    }

    /// Close and unregister a recipient that failed a broadcast write.
    /// Close is best-effort; a close failure is logged and ignored.
    async fn drop_connection(&self, conn: &dyn Connection) {
        if let Err(e) = conn.close().await {
            debug!(connection = %conn.id(), "Close failed: {}", e);
        }
        self.registry.unregister(conn.id());
    }
}
