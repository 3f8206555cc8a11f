//! The authoritative set of currently-live connections.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::connection::{Connection, ConnectionId};

/// Live connection set, shared by every connection handler and the relay
/// loop.
///
/// All access goes through the interior mutex, so membership changes and
/// broadcast snapshots never observe each other mid-flight. Every
/// registered connection is assumed writable; a connection is removed
/// exactly once, by whichever side detects its failure first.
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: Mutex<HashMap<ConnectionId, Arc<dyn Connection>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the live set. Registering an id that is
    /// already present is a no-op.
    pub fn register(&self, conn: Arc<dyn Connection>) {
        self.inner.lock().entry(conn.id()).or_insert(conn);
    }

    /// Remove a connection if present. Idempotent: the handler and the
    /// relay loop may race to remove the same connection, and the loser
    /// is a silent no-op.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        self.inner.lock().remove(&id).is_some()
    }

    /// Copy of the current membership, taken under the lock, for one
    /// broadcast round.
    pub fn snapshot(&self) -> Vec<Arc<dyn Connection>> {
        self.inner.lock().values().cloned().collect()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.inner.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
