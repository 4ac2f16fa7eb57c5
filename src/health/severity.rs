//! Severity lattice.
//!
//! # Precedence
//! ```text
//! CRITICAL always wins
//! WARNING wins unless current is CRITICAL
//! UNKNOWN wins unless current is WARNING or CRITICAL
//! OK never changes current
//! ```
//!
//! # Design Decisions
//! - Precedence is an explicit table, not numeric max: UNKNOWN (3) must not
//!   mask an observed WARNING (1) or CRITICAL (2)
//! - The numeric discriminant is the process exit code

use std::fmt;

/// Outcome of a check, ordered by exit code.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Ok,
        Severity::Warning,
        Severity::Critical,
        Severity::Unknown,
    ];

    /// Combine the current verdict with a newly observed one.
    pub fn combine(self, new: Severity) -> Severity {
        match (self, new) {
            (Severity::Critical, _) | (_, Severity::Critical) => Severity::Critical,
            (Severity::Warning, _) | (_, Severity::Warning) => Severity::Warning,
            (Severity::Unknown, _) | (_, Severity::Unknown) => Severity::Unknown,
            (Severity::Ok, Severity::Ok) => Severity::Ok,
        }
    }

    /// Fold any number of severities, starting from OK.
    pub fn aggregate<I>(severities: I) -> Severity
    where
        I: IntoIterator<Item = Severity>,
    {
        severities
            .into_iter()
            .fold(Severity::Ok, |current, new| current.combine(new))
    }

    /// Process exit code for this severity.
    pub fn exit_code(self) -> u8 {
        self as u8
    }

    /// Upper-case label printed at the start of every report line.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }

    /// Short prefix used in front of individual verdict messages.
    pub fn message_prefix(self) -> &'static str {
        match self {
            Severity::Ok => "Ok",
            Severity::Warning => "Warn",
            Severity::Critical => "Crit",
            Severity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
