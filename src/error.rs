//! Error taxonomy shared by every probe.
//!
//! # Design Decisions
//! - Every variant aborts the pipeline at the point of detection
//! - Every variant is reported as UNKNOWN; none is downgraded to OK
//! - Threshold breaches and state mismatches are verdicts, not errors

use std::path::PathBuf;
use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::health::Severity;

/// Errors that abort a probe before a verdict can be produced.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The control socket does not exist.
    #[error("Socket file {} not found!", .0.display())]
    EndpointNotFound(PathBuf),

    /// The control socket exists but access was refused.
    #[error("Access to socket file {} denied!", .0.display())]
    PermissionDenied(PathBuf),

    /// No complete response within the configured wait.
    #[error("Connection to {endpoint} timed out after {secs} seconds")]
    Timeout { endpoint: String, secs: u64 },

    /// Any other transport fault.
    #[error("Error during socket connection: {0}")]
    ConnectionFailed(String),

    /// The stats response could not be decoded.
    #[error("Malformed stats response: {0}")]
    MalformedStats(String),

    /// A required column or field is absent from the response.
    #[error("Required column '{0}' missing from stats response")]
    MissingColumn(String),

    /// Warning threshold is not strictly below the critical threshold.
    #[error("Warning threshold ({warn}%) must be lower than critical threshold ({crit}%)")]
    InvalidThresholdConfiguration { warn: u32, crit: u32 },

    /// Named-entity mode asked for an entity absent from the snapshot.
    #[error("Unable to find {kind} {name}")]
    EntityNotFound { kind: &'static str, name: String },

    /// The persisted rate record is missing, corrupt, or could not be written.
    #[error("{0}")]
    StateUnavailable(String),

    /// The HTTP status page could not be fetched.
    #[error("Error requesting {url}: {reason}")]
    StatusRequest { url: String, reason: String },

    /// Configuration could not be loaded or failed validation.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Command-line flags that cannot be combined.
    #[error("{0}")]
    Usage(String),
}

impl ProbeError {
    /// Severity reported for this error.
    pub fn severity(&self) -> Severity {
        Severity::Unknown
    }
}
