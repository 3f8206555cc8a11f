//! Chat Relay Server - Entry Point
//!
//! Starts the relay loop and the HTTP/WebSocket server with graceful
//! shutdown support.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod models;
mod relay;

use api::ChatServer;
use config::Config;
use relay::{ConnectionRegistry, RelayService};

#[tokio::main]
async fn main() -> error::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_relay=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Chat Relay Server");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Create the registry and the relay loop
    let registry = Arc::new(ConnectionRegistry::new());
    let (relay_service, relay_handle) =
        RelayService::new(registry.clone(), config.relay.clone());

    // Create shutdown channel
    let (shutdown_tx, _) = watch::channel(false);

    // The relay loop must be running before the first client connects
    let relay_shutdown = shutdown_tx.subscribe();
    let relay_task = tokio::spawn(async move {
        relay_service.run(relay_shutdown).await;
    });

    // Trigger shutdown on Ctrl+C or SIGTERM
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        let _ = signal_tx.send(true);
    });

    // Serve until shutdown; a bind failure is fatal
    let server = ChatServer::new(config.clone(), registry, relay_handle);
    let server_shutdown = shutdown_tx.subscribe();

    info!("Server starting on {}", config.server_addr());

    let result = server.run(server_shutdown).await;
    if let Err(e) = &result {
        error!("Chat server failed: {}", e);
    }

    // Stop the relay loop once the server is done
    let _ = shutdown_tx.send(true);
    let _ = relay_task.await;

    info!("Chat Relay Server stopped");
    result
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
