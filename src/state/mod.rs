//! Persisted rate state.
//!
//! # Responsibilities
//! - Keep the `{timestamp, counter}` record of the previous probe run
//! - Hide the storage backend behind `RateStore`
//!
//! # Design Decisions
//! - Read once at start, written once at end; the evaluator never touches files
//! - File writes replace the record atomically (temp file + rename)
//! - A missing or corrupt record is reported, never a panic

pub mod file;

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

pub use file::FileRateStore;

/// A cumulative counter observed at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    pub counter: u64,
}

impl RateRecord {
    /// Per-second rate between `previous` and `self`.
    ///
    /// Counter resets clamp to zero; a zero interval counts as one second.
    pub fn rate_since(&self, previous: &RateRecord) -> f64 {
        let elapsed = self.timestamp.saturating_sub(previous.timestamp).max(1);
        let delta = self.counter.saturating_sub(previous.counter);
        delta as f64 / elapsed as f64
    }
}

/// Outcome of reading the previous record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    Found(RateRecord),
    Missing,
    Corrupt(String),
}

/// Storage for the previous run's record.
pub trait RateStore {
    fn load(&self) -> Loaded;
    fn store(&self, record: &RateRecord) -> Result<(), ProbeError>;
    /// Human-readable location, used in messages.
    fn describe(&self) -> String;
}
