//! Chat Relay - Real-Time Message Broadcast
//!
//! A WebSocket message relay written in Rust.
//!
//! ## Features
//!
//! - Persistent bidirectional WebSocket connections
//! - Single relay loop fanning every inbound message out to all clients
//! - Mutex-guarded connection registry with failure pruning
//! - Configurable self-echo and broadcast write timeout
//! - Static UI serving and health endpoints

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod relay;

pub use config::Config;
pub use error::{ChatError, Result};
