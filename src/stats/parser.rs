//! CSV stats decoding.
//!
//! # Responsibilities
//! - Split the raw response into a header and data rows
//! - Strip the `#` marker HAProxy puts in front of the first column name
//! - Reject rows whose arity differs from the header
//!
//! # Design Decisions
//! - Columns are looked up by exact name; a missing one is an error, never a default
//! - Parsing is all-or-nothing: one bad row fails the whole snapshot

use std::collections::HashMap;

use crate::error::ProbeError;

const DELIMITER: char = ',';
const HEADER_MARKER: char = '#';

/// A decoded stats response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl StatsSnapshot {
    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows in response order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Position of `name` in the header.
    pub fn column(&self, name: &str) -> Result<usize, ProbeError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ProbeError::MissingColumn(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decode a raw `show stat` style response.
pub fn parse(raw: &str) -> Result<StatsSnapshot, ProbeError> {
    let mut lines = raw
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .enumerate()
        .skip_while(|(_, line)| line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| ProbeError::MalformedStats("response has no header line".into()))?;

    let columns: Vec<String> = header
        .trim_start()
        .trim_start_matches(HEADER_MARKER)
        .split(DELIMITER)
        .map(|name| name.trim().to_string())
        .collect();

    let mut index = HashMap::with_capacity(columns.len());
    for (pos, name) in columns.iter().enumerate() {
        if index.insert(name.clone(), pos).is_some() {
            return Err(ProbeError::MalformedStats(format!(
                "duplicate column '{}' in header",
                name
            )));
        }
    }

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<String> = line.split(DELIMITER).map(str::to_string).collect();
        if fields.len() != columns.len() {
            return Err(ProbeError::MalformedStats(format!(
                "line {} has {} fields, header has {}",
                line_no + 1,
                fields.len(),
                columns.len()
            )));
        }
        rows.push(fields);
    }

    tracing::debug!(columns = columns.len(), rows = rows.len(), "Parsed stats snapshot");

    Ok(StatsSnapshot {
        columns,
        index,
        rows,
    })
}
