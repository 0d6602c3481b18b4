//! Drive Space Library
//!
//! Disk utilization reporting for monitored elements. Each run reads the
//! drive row of every selected element's disk table, computes utilization,
//! and either shows the results to a user or sends them to a health-check
//! consumer as a `DiskInfo` message.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use drive_space_mcp::{build_report, DiskSample};
//!
//! let samples = vec![DiskSample::new("dma-01", Some("1000.0"), Some("250.0"))];
//! let (report, log) = build_report(&samples);
//! assert_eq!(report.utilization_percent(), [75.0]);
//! ```
//!
//! # Usage as Binary
//!
//! Run once: `drive-space-mcp run --inventory elements.json`
//!
//! Or serve as MCP, configured in `.mcp.json`:
//! ```json
//! { "mcpServers": { "drive-space": { "command": "./drive-space-mcp", "args": ["serve"] } } }
//! ```

pub mod config;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod runner;
pub mod server;
pub mod source;
pub mod types;
pub mod utilization;

// Re-export main types
pub use config::ReporterConfig;
pub use delivery::{Delivery, DeliveryOutcome, InteractiveDelivery, MessageDelivery, Mode};
pub use error::{ReporterError, ReporterResult};
pub use runner::{RunSummary, Runner};
pub use server::DriveSpaceMcpServer;
pub use source::{ElementSource, InventorySource, LocalDiskSource};
pub use types::{DiskSample, Log, Utilization, UtilizationReport};
pub use utilization::{build_report, compute_utilization, UtilizationReporter};
