//! Concrete probes.
//!
//! # Data Flow
//! ```text
//! haproxy.rs:
//!     StatsSource (net) → parse → Inventory::build
//!     → evaluate (instance or single entity) → CheckResult
//!
//! apache.rs:
//!     RateStore::load → StatusSource → ServerStatus
//!     → RateStore::store → rate + worker evaluation → CheckResult
//! ```
//!
//! # Design Decisions
//! - Each pipeline is straight-line: no loops, no retries
//! - I/O is injected through traits so evaluation is testable without sockets

pub mod apache;
pub mod haproxy;

pub use apache::{ApacheCheck, HttpStatusSource, StatusSource};
pub use haproxy::{HaproxyCheck, Mode};
