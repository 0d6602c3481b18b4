//! Element source for the local host
//!
//! Presents this machine as a single active element whose disk table has one
//! row per mounted disk: `[key, filesystem, total MB, free MB]`. Rows are
//! keyed by mount point, with Windows drive roots written as `C:`.

use std::path::Path;

use sysinfo::{Disks, System};

use super::{Cell, Element, ElementSource, ElementState, Row};
use crate::error::ReporterResult;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// [`ElementSource`] reading local disks through `sysinfo`
#[derive(Debug, Clone)]
pub struct LocalDiskSource {
    element: Element,
}

impl LocalDiskSource {
    /// The local host, reported under the given protocol name
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            element: Element {
                name: System::host_name().unwrap_or_else(|| "localhost".to_string()),
                protocol: protocol.into(),
                state: ElementState::Active,
                agent_id: 0,
                element_id: 0,
            },
        }
    }
}

impl ElementSource for LocalDiskSource {
    fn elements(&self) -> ReporterResult<Vec<Element>> {
        Ok(vec![self.element.clone()])
    }

    fn table_row(
        &self,
        element: &Element,
        _table_id: u32,
        key: &str,
    ) -> ReporterResult<Option<Row>> {
        if element != &self.element {
            return Ok(None);
        }

        let disks = Disks::new_with_refreshed_list();
        let row = disks
            .iter()
            .find(|disk| mount_key(disk.mount_point()) == key)
            .map(|disk| {
                vec![
                    Cell::from(key),
                    Cell::from(disk.file_system().to_string_lossy().to_string()),
                    Cell::from(disk.total_space() as f64 / BYTES_PER_MB),
                    Cell::from(disk.available_space() as f64 / BYTES_PER_MB),
                ]
            });

        Ok(row)
    }
}

/// Row key for a mount point: trailing separators dropped, root kept as `/`
pub fn mount_key(mount_point: &Path) -> String {
    let path = mount_point.to_string_lossy();
    let trimmed = path.trim_end_matches(&['\\', '/'][..]);
    if trimmed.is_empty() {
        path.chars().take(1).collect()
    } else {
        trimmed.to_string()
    }
}
