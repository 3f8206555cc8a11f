//! Connection registry and broadcast fan-out.
//!
//! One handler task per client feeds a single bounded queue; one relay
//! task drains the queue and fans each message out to every registered
//! connection, pruning any recipient that fails on write.

pub mod broadcaster;
pub mod connection;
pub mod handler;
pub mod registry;

pub use broadcaster::{Envelope, RelayHandle, RelayService};
pub use connection::{decode_frame, Connection, ConnectionId, WsConnection};
pub use handler::run_connection;
pub use registry::ConnectionRegistry;

#[cfg(test)]
pub(crate) mod testing;
