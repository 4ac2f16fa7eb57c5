//! Configuration schema definitions.
//!
//! This module defines the configuration shared by the probe binaries.
//! All types derive Serde traits for deserialization from config files;
//! command-line flags override whatever the file provides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the probes.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// HAProxy stats socket settings.
    pub haproxy: HaproxyConfig,

    /// Session usage thresholds for HAProxy entities.
    pub thresholds: ThresholdConfig,

    /// Apache status page settings.
    pub apache: ApacheConfig,

    /// Report output settings.
    pub output: OutputConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HAProxy stats socket configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HaproxyConfig {
    /// Path to the admin socket.
    pub socket_path: PathBuf,

    /// Command sent to the socket.
    pub command: String,

    /// Bound on the whole socket exchange, in seconds.
    pub timeout_secs: u64,
}

impl Default for HaproxyConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("/run/haproxy/admin.sock"),
            command: "show stat\n".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Warning/critical percentages of an entity's session limit.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThresholdConfig {
    pub session_warn_percent: u32,
    pub session_crit_percent: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            session_warn_percent: 80,
            session_crit_percent: 90,
        }
    }
}

/// Apache `server-status` probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApacheConfig {
    pub hostname: String,
    pub port: u16,
    /// Use https instead of http.
    pub ssl: bool,
    /// Path of the status handler, without the `?auto` query.
    pub status_page: String,

    /// Percent of scoreboard slots in use that raises a warning.
    pub worker_warn_percent: u32,

    /// Percent of scoreboard slots in use that raises a critical.
    pub worker_crit_percent: u32,

    /// Fewer idle workers than this raises a warning.
    pub min_idle_workers: u64,

    /// Where the previous `{timestamp, counter}` record is kept.
    pub state_file: PathBuf,

    pub timeout_secs: u64,
}

impl Default for ApacheConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: 80,
            ssl: false,
            status_page: "server-status".to_string(),
            worker_warn_percent: 80,
            worker_crit_percent: 100,
            min_idle_workers: 2,
            state_file: PathBuf::from("/var/tmp/nagios_check_apache2_status_last_run"),
            timeout_secs: 10,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Append the perfdata tail to the report line.
    pub perfdata: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}
