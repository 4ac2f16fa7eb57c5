//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (debug per entity, info per pipeline, warn on faults)
//!     → logging.rs subscriber
//!     → stderr
//! ```
//!
//! # Design Decisions
//! - Structured fields rather than formatted strings where practical
//! - Quiet by default (`warn`) so cron and monitoring logs stay clean

pub mod logging;
