//! HTTP route definitions

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use super::handlers;
use super::server::AppState;
use super::websocket;

/// Create the router with all routes
pub fn create_router(state: AppState, public_dir: &str) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        .route("/api/status", get(handlers::health::status))
        // WebSocket endpoint
        .route("/ws", get(websocket::chat::chat_ws))
        // Static chat UI
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
}
