//! Chat server using Axum
//!
//! Serves the static chat UI, health endpoints, and the WebSocket
//! upgrade route that feeds the relay.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::config::{Config, ServerConfig};
use crate::error::{ChatError, Result};
use crate::relay::{ConnectionRegistry, RelayHandle};

use super::routes;

/// Shared state for HTTP and WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub relay: RelayHandle,
    pub started_at: Instant,
}

/// HTTP/WebSocket server
pub struct ChatServer {
    config: ServerConfig,
    state: AppState,
}

impl ChatServer {
    /// Create a new chat server
    pub fn new(config: Config, registry: Arc<ConnectionRegistry>, relay: RelayHandle) -> Self {
        let state = AppState {
            registry,
            relay,
            started_at: Instant::now(),
        };

        Self {
            config: config.server,
            state,
        }
    }

    /// Build the router
    fn build_router(&self) -> Router {
        routes::create_router(self.state.clone(), &self.config.public_dir)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server. A bind failure propagates to the caller; nothing
    /// has started serving at that point.
    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ChatError::InvalidConfig(format!(
                    "invalid server address {}:{}",
                    self.config.host, self.config.port
                ))
            })?;

        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Chat server listening on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.changed().await;
            })
            .await
            .map_err(|e| ChatError::Internal(e.to_string()))?;

        info!("Chat server shut down");
        Ok(())
    }
}
