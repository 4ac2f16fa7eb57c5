//! Unix socket stats transport.
//!
//! # Responsibilities
//! - Connect to the HAProxy stats socket
//! - Send one command and return the full textual response
//! - Translate I/O faults into `ProbeError` transport variants
//!
//! # Design Decisions
//! - The whole exchange (connect, write, read) shares one timeout
//! - No retries: one snapshot per invocation

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::UnixStream;
use tokio::time;

use crate::config::schema::HaproxyConfig;
use crate::error::ProbeError;
use crate::net::connection::StatsConnection;

/// Anything that can answer a stats command with raw text.
pub trait StatsSource {
    fn fetch_stats(&self, command: &str) -> impl Future<Output = Result<String, ProbeError>>;
}

/// The HAProxy admin socket.
#[derive(Debug, Clone)]
pub struct StatsSocket {
    path: PathBuf,
    timeout: Duration,
}

impl StatsSocket {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    pub fn from_config(config: &HaproxyConfig) -> Self {
        Self::new(&config.socket_path, Duration::from_secs(config.timeout_secs))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Send `command` and read the response until the peer closes.
    pub async fn send_command(&self, command: &str) -> Result<String, ProbeError> {
        tracing::debug!(socket = %self.path.display(), command = command.trim(), "Sending stats command");

        let exchange = async {
            let stream = UnixStream::connect(&self.path).await?;
            let mut conn = StatsConnection::new(stream);
            conn.exchange(command).await
        };

        match time::timeout(self.timeout, exchange).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                tracing::warn!(socket = %self.path.display(), error = %e, "Stats exchange failed");
                Err(self.classify(e))
            }
            Err(_) => {
                tracing::warn!(socket = %self.path.display(), "Stats exchange timed out");
                Err(self.timed_out())
            }
        }
    }

    fn timed_out(&self) -> ProbeError {
        ProbeError::Timeout {
            endpoint: format!("socket {}", self.path.display()),
            secs: self.timeout.as_secs(),
        }
    }

    fn classify(&self, err: io::Error) -> ProbeError {
        match err.kind() {
            io::ErrorKind::NotFound => ProbeError::EndpointNotFound(self.path.clone()),
            io::ErrorKind::PermissionDenied => ProbeError::PermissionDenied(self.path.clone()),
            io::ErrorKind::TimedOut => self.timed_out(),
            _ => ProbeError::ConnectionFailed(err.to_string()),
        }
    }
}

impl StatsSource for StatsSocket {
    async fn fetch_stats(&self, command: &str) -> Result<String, ProbeError> {
        self.send_command(command).await
    }
}
