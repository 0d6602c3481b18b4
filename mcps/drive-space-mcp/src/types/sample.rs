//! Raw disk samples and per-element utilization

use serde::{Deserialize, Serialize};

/// One element's raw disk reading, as read from the element's disk table
///
/// Values are kept as text; `None` means the cell or row could not be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskSample {
    /// Name of the monitored element
    pub element_name: String,
    /// Total disk size in MB, unparsed
    pub total_size: Option<String>,
    /// Free disk space in MB, unparsed
    pub free_space: Option<String>,
}

impl DiskSample {
    pub fn new(
        element_name: impl Into<String>,
        total_size: Option<impl Into<String>>,
        free_space: Option<impl Into<String>>,
    ) -> Self {
        Self {
            element_name: element_name.into(),
            total_size: total_size.map(Into::into),
            free_space: free_space.map(Into::into),
        }
    }
}

/// Computed utilization for a single element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utilization {
    /// Free space in whole MB
    pub free_space: i64,
    /// Total size in whole MB
    pub total_size: i64,
    /// Used share of the disk, in percent with two decimals
    pub utilization_percent: f64,
    /// Log lines describing how this element was processed
    pub log_lines: Vec<String>,
}

impl Utilization {
    /// Whether this row is the zero sentinel used for unreadable data
    pub fn is_degraded(&self) -> bool {
        self.total_size == 0 && self.free_space == 0 && self.utilization_percent == 0.0
    }
}
