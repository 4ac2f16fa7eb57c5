//! Perfdata (metrics tail) formatting.
//!
//! Each datum renders as `'label'=value[unit];warn;crit;min;max`, with empty
//! slots for absent bounds. Data are joined by single spaces.

use std::fmt;

/// A numeric value rendered into the perfdata tail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerfValue {
    Int(u64),
    Float(f64),
}

impl fmt::Display for PerfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerfValue::Int(v) => write!(f, "{}", v),
            // Whole floats print without a fraction (90.0 → 90).
            PerfValue::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{}", *v as i64),
            PerfValue::Float(v) => write!(f, "{:.2}", v),
        }
    }
}

impl From<u64> for PerfValue {
    fn from(v: u64) -> Self {
        PerfValue::Int(v)
    }
}

impl From<f64> for PerfValue {
    fn from(v: f64) -> Self {
        PerfValue::Float(v)
    }
}

/// One named metric with optional bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfDatum {
    pub label: String,
    pub value: PerfValue,
    pub unit: &'static str,
    pub warn: Option<PerfValue>,
    pub crit: Option<PerfValue>,
    pub min: Option<PerfValue>,
    pub max: Option<PerfValue>,
}

impl PerfDatum {
    /// A datum with no unit and no bounds.
    pub fn new(label: impl Into<String>, value: impl Into<PerfValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            unit: "",
            warn: None,
            crit: None,
            min: None,
            max: None,
        }
    }

    pub fn unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    pub fn thresholds(mut self, warn: Option<PerfValue>, crit: Option<PerfValue>) -> Self {
        self.warn = warn;
        self.crit = crit;
        self
    }

    pub fn range(mut self, min: Option<PerfValue>, max: Option<PerfValue>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

fn slot(value: &Option<PerfValue>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl fmt::Display for PerfDatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}'={}{};{};{};{};{}",
            self.label,
            self.value,
            self.unit,
            slot(&self.warn),
            slot(&self.crit),
            slot(&self.min),
            slot(&self.max)
        )
    }
}

/// Join data into the text that follows the `|`.
pub fn format_perfdata(data: &[PerfDatum]) -> String {
    data.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
