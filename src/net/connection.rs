//! Control-channel connection lifecycle.
//!
//! # Responsibilities
//! - Own the socket handle for exactly one command exchange
//! - Release the handle on every exit path, including errors and timeouts
//! - Tag log events with a connection ID

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

/// Global atomic counter for connection IDs.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// An open stats connection. The socket closes when this is dropped.
#[derive(Debug)]
pub struct StatsConnection {
    stream: UnixStream,
    id: ConnectionId,
}

impl StatsConnection {
    pub fn new(stream: UnixStream) -> Self {
        let id = ConnectionId::new();
        tracing::trace!(connection_id = %id, "Stats connection opened");
        Self { stream, id }
    }

    /// Write `command`, half-close, and read until the peer closes.
    pub async fn exchange(&mut self, command: &str) -> std::io::Result<String> {
        self.stream.write_all(command.as_bytes()).await?;
        self.stream.shutdown().await?;

        let mut buf = Vec::with_capacity(4096);
        self.stream.read_to_end(&mut buf).await?;
        tracing::trace!(connection_id = %self.id, bytes = buf.len(), "Stats response received");

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Drop for StatsConnection {
    fn drop(&mut self) {
        tracing::trace!(connection_id = %self.id, "Stats connection closed");
    }
}
