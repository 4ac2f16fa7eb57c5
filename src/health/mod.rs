//! Health evaluation subsystem.
//!
//! # Data Flow
//! ```text
//! Inventory (stats::entity)
//!     → evaluator.rs (state check + usage check per entity,
//!                     structural checks per instance)
//!     → Vec<Verdict>
//!     → severity.rs (fold with the precedence lattice)
//!     → final Severity
//! ```
//!
//! # Design Decisions
//! - Evaluation is pure: no I/O, no shared state
//! - Verdicts carry their own message so rendering never re-derives them

pub mod evaluator;
pub mod severity;

pub use evaluator::{evaluate_entity, evaluate_inventory, evaluate_usage, Thresholds, Verdict};
pub use severity::Severity;
