//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Threshold ordering (warning strictly below critical)
//! - Value ranges (timeouts > 0, non-empty command and paths)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProbeConfig → Result<(), Vec<ValidationError>>
//! - Runs before any socket or HTTP I/O

use std::fmt;

use crate::config::schema::ProbeConfig;
use crate::health::Thresholds;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check every semantic constraint of `config`.
pub fn validate_config(config: &ProbeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = Thresholds::new(
        config.thresholds.session_warn_percent,
        config.thresholds.session_crit_percent,
    ) {
        errors.push(ValidationError::new("thresholds", e.to_string()));
    }

    if let Err(e) = Thresholds::new(
        config.apache.worker_warn_percent,
        config.apache.worker_crit_percent,
    ) {
        errors.push(ValidationError::new("apache.worker_thresholds", e.to_string()));
    }

    if config.haproxy.timeout_secs == 0 {
        errors.push(ValidationError::new("haproxy.timeout_secs", "must be greater than 0"));
    }
    if config.apache.timeout_secs == 0 {
        errors.push(ValidationError::new("apache.timeout_secs", "must be greater than 0"));
    }
    if config.haproxy.command.trim().is_empty() {
        errors.push(ValidationError::new("haproxy.command", "must not be empty"));
    }
    if config.haproxy.socket_path.as_os_str().is_empty() {
        errors.push(ValidationError::new("haproxy.socket_path", "must not be empty"));
    }
    if config.apache.hostname.is_empty() {
        errors.push(ValidationError::new("apache.hostname", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
