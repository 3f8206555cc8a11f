//! Shared test doubles for the relay modules.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{ChatError, Result};
use crate::models::Message;

use super::connection::{Connection, ConnectionId};

/// In-memory connection that records every message delivered to it.
pub struct MockConnection {
    id: ConnectionId,
    sent: Mutex<Vec<Message>>,
    fail_sends: AtomicBool,
    stall_sends: AtomicBool,
    closed: AtomicBool,
}

impl MockConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::new(),
            sent: Mutex::new(Vec::new()),
            fail_sends: AtomicBool::new(false),
            stall_sends: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        })
    }

    /// A connection whose every send fails with a transport error.
    pub fn failing() -> Arc<Self> {
        let conn = Self::new();
        conn.fail_sends.store(true, Ordering::Relaxed);
        conn
    }

    /// A connection whose sends never complete, simulating a hung client.
    pub fn stalled() -> Arc<Self> {
        let conn = Self::new();
        conn.stall_sends.store(true, Ordering::Relaxed);
        conn
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, msg: &Message) -> Result<()> {
        if self.stall_sends.load(Ordering::Relaxed) {
            futures::future::pending::<()>().await;
        }
        if self.fail_sends.load(Ordering::Relaxed) {
            return Err(ChatError::Transport("simulated write failure".into()));
        }
        if self.closed.load(Ordering::Relaxed) {
            return Err(ChatError::ConnectionClosed);
        }
        self.sent.lock().push(msg.clone());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// Shorthand for a message from the canonical test sender.
pub fn message(body: &str) -> Message {
    Message::new("a@x.com", "alice", body)
}

/// Poll `condition` until it holds or the test times out.
pub async fn eventually(condition: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        if tokio::time::Instant::now() > deadline {
            panic!("condition not met within 5s");
        }
        tokio::task::yield_now().await;
    }
}
