//! Utilization report and run log

use serde::Serialize;

use super::Utilization;

/// Per-run disk utilization report
///
/// Four index-aligned sequences: entry `i` of each describes the same element.
/// Rows can only be added while the report is being built inside this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UtilizationReport {
    names: Vec<String>,
    free_space: Vec<i64>,
    total_size: Vec<i64>,
    utilization_percent: Vec<f64>,
}

/// A borrowed view of one report row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportRow<'a> {
    pub name: &'a str,
    pub free_space: i64,
    pub total_size: i64,
    pub utilization_percent: f64,
}

impl UtilizationReport {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
            free_space: Vec::with_capacity(capacity),
            total_size: Vec::with_capacity(capacity),
            utilization_percent: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &str, utilization: &Utilization) {
        self.names.push(name.to_string());
        self.free_space.push(utilization.free_space);
        self.total_size.push(utilization.total_size);
        self.utilization_percent
            .push(utilization.utilization_percent);
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn free_space(&self) -> &[i64] {
        &self.free_space
    }

    pub fn total_size(&self) -> &[i64] {
        &self.total_size
    }

    pub fn utilization_percent(&self) -> &[f64] {
        &self.utilization_percent
    }

    /// Number of elements in the report
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate rows in element order
    pub fn rows(&self) -> impl Iterator<Item = ReportRow<'_>> {
        (0..self.len()).map(move |i| ReportRow {
            name: &self.names[i],
            free_space: self.free_space[i],
            total_size: self.total_size[i],
            utilization_percent: self.utilization_percent[i],
        })
    }
}

/// Append-only text log built during a run
///
/// Shown to the user by the interactive sink and dropped by the message sink.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Log {
    lines: Vec<String>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.lines.extend(lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines joined with newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
