//! Report line rendering.

use crate::error::ProbeError;
use crate::health::{Severity, Verdict};
use crate::report::perfdata::{format_perfdata, PerfDatum};

/// Terminal output of a probe run.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub severity: Severity,
    pub summary: String,
    /// Non-OK findings, in evaluation order.
    pub messages: Vec<String>,
    pub metrics: Vec<PerfDatum>,
}

impl CheckResult {
    /// Build a result whose severity is the aggregate of `verdicts`.
    pub fn from_verdicts(
        summary: impl Into<String>,
        verdicts: &[Verdict],
        metrics: Vec<PerfDatum>,
    ) -> Self {
        Self {
            severity: Severity::aggregate(verdicts.iter().map(|v| v.severity)),
            summary: summary.into(),
            messages: verdicts
                .iter()
                .filter(|v| v.severity != Severity::Ok)
                .map(ToString::to_string)
                .collect(),
            metrics,
        }
    }
}

/// `SEVERITY - summary[, message...][ | perfdata]`
pub fn render(result: &CheckResult, include_metrics: bool) -> String {
    let mut line = format!("{} - {}", result.severity, result.summary);
    for message in &result.messages {
        line.push_str(", ");
        line.push_str(message);
    }
    if include_metrics && !result.metrics.is_empty() {
        line.push_str(" | ");
        line.push_str(&format_perfdata(&result.metrics));
    }
    line
}

/// The single line printed when the pipeline aborts.
///
/// Multi-line error text (e.g. TOML parse excerpts) is folded onto one line.
pub fn render_error(err: &ProbeError) -> String {
    let text = err.to_string();
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{} - {}", err.severity(), flat)
}
