//! Report rendering.
//!
//! # Responsibilities
//! - Format one report line from a `CheckResult`
//! - Format the optional perfdata tail after a `|`
//!
//! # Design Decisions
//! - The renderer never decides severity; it formats the aggregator's output
//! - Every line starts with the severity label so monitoring parsers always
//!   find a recognizable prefix

pub mod perfdata;
pub mod render;

pub use perfdata::{format_perfdata, PerfDatum, PerfValue};
pub use render::{render, render_error, CheckResult};
