//! Element and disk table sources
//!
//! The monitoring platform is reached through [`ElementSource`]: it lists the
//! monitored elements and returns single rows of their tables. Selection of
//! the elements to report on, and of the consumer that receives the report,
//! happens here on top of that trait.

pub mod inventory;
pub mod local;

use serde::{Deserialize, Serialize};

use crate::config::{ConsumerConfig, ElementFilter, TableLayout};
use crate::error::{ReporterError, ReporterResult};
use crate::types::{Destination, DiskSample};

pub use inventory::InventorySource;
pub use local::LocalDiskSource;

/// A table cell as exposed by the platform
pub type Cell = serde_json::Value;

/// A table row, cells in column order
pub type Row = Vec<Cell>;

/// Element lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    Active,
    Paused,
    Stopped,
    Masked,
    Error,
    /// Also used when a source gives no state
    #[default]
    Undefined,
}

/// A monitored element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub name: String,
    /// Name of the protocol (driver) the element runs
    pub protocol: String,
    pub state: ElementState,
    pub agent_id: u32,
    pub element_id: u32,
}

/// Access to the platform's elements and their tables
pub trait ElementSource: Send + Sync {
    /// All known elements, in platform order
    fn elements(&self) -> ReporterResult<Vec<Element>>;

    /// One row of one table, or `None` when the table or key does not exist
    fn table_row(&self, element: &Element, table_id: u32, key: &str)
        -> ReporterResult<Option<Row>>;
}

impl ElementFilter {
    pub fn matches(&self, element: &Element) -> bool {
        element.protocol == self.protocol && element.state == self.state
    }
}

/// Text of a cell, or `None` for null cells
pub fn cell_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Null => None,
        Cell::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read one disk sample per selected element, in source order
pub fn collect_samples(
    source: &dyn ElementSource,
    filter: &ElementFilter,
    layout: &TableLayout,
) -> ReporterResult<Vec<DiskSample>> {
    let mut samples = Vec::new();

    for element in source.elements()?.iter().filter(|e| filter.matches(e)) {
        let row = source.table_row(element, layout.table_id, &layout.row_key)?;

        let sample = match row {
            Some(row) => {
                let cell = |index: usize| row.get(index).and_then(cell_text);
                DiskSample {
                    element_name: element.name.clone(),
                    total_size: cell(layout.total_size_column),
                    free_space: cell(layout.free_space_column),
                }
            }
            None => {
                tracing::warn!(
                    element = %element.name,
                    table = layout.table_id,
                    key = %layout.row_key,
                    "disk row not found"
                );
                DiskSample {
                    element_name: element.name.clone(),
                    total_size: None,
                    free_space: None,
                }
            }
        };

        tracing::debug!(?sample, "collected disk sample");
        samples.push(sample);
    }

    Ok(samples)
}

/// Resolve where the report is sent
///
/// An explicit agent/element pair in the configuration wins; otherwise the
/// first active element running the consumer protocol is used. Setting only
/// one of the two ids is a configuration error.
pub fn find_consumer(
    source: &dyn ElementSource,
    consumer: &ConsumerConfig,
) -> ReporterResult<Destination> {
    match (consumer.agent_id, consumer.element_id) {
        (Some(agent_id), Some(element_id)) => {
            return Ok(Destination {
                agent_id,
                element_id,
                receiver_pid: consumer.receiver_pid,
            });
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ReporterError::Config(
                "consumer agent_id and element_id must be set together".to_string(),
            ));
        }
        (None, None) => {}
    }

    source
        .elements()?
        .into_iter()
        .find(|e| e.protocol == consumer.protocol && e.state == ElementState::Active)
        .map(|e| Destination {
            agent_id: e.agent_id,
            element_id: e.element_id,
            receiver_pid: consumer.receiver_pid,
        })
        .ok_or_else(|| ReporterError::ConsumerNotFound {
            protocol: consumer.protocol.clone(),
        })
}
