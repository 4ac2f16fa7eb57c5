//! Stats ingestion.
//!
//! # Data Flow
//! ```text
//! raw response text (net)
//!     → parser.rs (header + rows → StatsSnapshot)
//!     → entity.rs (discriminator dispatch → Inventory of typed entities)
//! ```
//!
//! # Design Decisions
//! - Both stages fail fast with `ProbeError`; nothing is defaulted silently
//! - Each stage returns a new value; nothing mutates an earlier stage's output

pub mod entity;
pub mod parser;

pub use entity::{Entity, EntityKind, Inventory, ProxyStats, ServerStats};
pub use parser::{parse, StatsSnapshot};
