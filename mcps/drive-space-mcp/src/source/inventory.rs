//! Element source backed by a JSON inventory snapshot
//!
//! ```json
//! { "elements": [ {
//!     "name": "dma-01", "protocol": "Microsoft Platform", "state": "active",
//!     "agentId": 1, "elementId": 10,
//!     "tables": { "170": { "C:": ["C:", "NTFS", "1000.0", "250.0"] } }
//! } ] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Element, ElementSource, ElementState, Row};
use crate::error::{ReporterError, ReporterResult};

/// Inventory document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub elements: Vec<InventoryElement>,
}

/// An element with its table contents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryElement {
    pub name: String,
    pub protocol: String,
    #[serde(default)]
    pub state: ElementState,
    pub agent_id: u32,
    pub element_id: u32,
    /// Table id (as text) → row key → cells
    #[serde(default)]
    pub tables: BTreeMap<String, BTreeMap<String, Row>>,
}

impl InventoryElement {
    fn element(&self) -> Element {
        Element {
            name: self.name.clone(),
            protocol: self.protocol.clone(),
            state: self.state,
            agent_id: self.agent_id,
            element_id: self.element_id,
        }
    }

    fn is(&self, element: &Element) -> bool {
        self.agent_id == element.agent_id && self.element_id == element.element_id
    }
}

/// [`ElementSource`] over an in-memory [`Inventory`]
#[derive(Debug, Clone)]
pub struct InventorySource {
    inventory: Inventory,
}

impl InventorySource {
    pub fn new(inventory: Inventory) -> Self {
        Self { inventory }
    }

    /// Load an inventory file
    pub fn load(path: &Path) -> ReporterResult<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded inventory from: {}", path.display());
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ReporterResult<Self> {
        let inventory = serde_json::from_str(content).map_err(ReporterError::Inventory)?;
        Ok(Self::new(inventory))
    }

    pub fn from_value(value: serde_json::Value) -> ReporterResult<Self> {
        let inventory = serde_json::from_value(value).map_err(ReporterError::Inventory)?;
        Ok(Self::new(inventory))
    }
}

impl ElementSource for InventorySource {
    fn elements(&self) -> ReporterResult<Vec<Element>> {
        Ok(self
            .inventory
            .elements
            .iter()
            .map(InventoryElement::element)
            .collect())
    }

    fn table_row(
        &self,
        element: &Element,
        table_id: u32,
        key: &str,
    ) -> ReporterResult<Option<Row>> {
        let row = self
            .inventory
            .elements
            .iter()
            .find(|e| e.is(element))
            .and_then(|e| e.tables.get(&table_id.to_string()))
            .and_then(|table| table.get(key))
            .cloned();
        Ok(row)
    }
}
