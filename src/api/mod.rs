//! HTTP and WebSocket surface

pub mod handlers;
pub mod routes;
pub mod server;
pub mod websocket;

pub use server::{AppState, ChatServer};
