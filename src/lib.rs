//! Operational health-check probes for Nagios/Icinga style monitoring.

pub mod checks;
pub mod config;
pub mod error;
pub mod health;
pub mod net;
pub mod observability;
pub mod report;
pub mod state;
pub mod stats;

pub use config::ProbeConfig;
pub use error::ProbeError;
pub use health::Severity;
pub use report::CheckResult;
