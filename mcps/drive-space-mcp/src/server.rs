//! MCP Server exposing the disk utilization report

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{ElementFilter, ReporterConfig, TableLayout};
use crate::source::{collect_samples, ElementSource};
use crate::types::{DiskSample, Log, UtilizationReport};
use crate::utilization::UtilizationReporter;

/// The Drive Space MCP Server
#[derive(Clone)]
pub struct DriveSpaceMcpServer {
    config: Arc<ReporterConfig>,
    source: Arc<dyn ElementSource>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Parameter Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CheckDriveSpaceParams {
    #[schemars(description = "Protocol name of the elements to check (defaults to the configured protocol)")]
    pub protocol: Option<String>,

    #[schemars(description = "Disk table row key, e.g. 'C:' (defaults to the configured key)")]
    pub row_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ComputeUtilizationParams {
    #[schemars(description = "Total disk size in MB, as read from the element")]
    pub total_size: String,

    #[schemars(description = "Free disk space in MB, as read from the element")]
    pub free_space: String,

    #[schemars(description = "Element name used in the log lines")]
    pub element_name: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DriveSpaceResponse {
    pub report: UtilizationReport,
    pub log: Log,
}

fn json_result<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl DriveSpaceMcpServer {
    pub fn new(config: ReporterConfig, source: Arc<dyn ElementSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Check disk utilization of every active monitored element. Returns per-element free space, total size and utilization percentage, plus the processing log."
    )]
    async fn check_drive_space(
        &self,
        Parameters(params): Parameters<CheckDriveSpaceParams>,
    ) -> Result<CallToolResult, McpError> {
        let filter = ElementFilter {
            protocol: params
                .protocol
                .unwrap_or_else(|| self.config.selection.protocol.clone()),
            state: self.config.selection.state,
        };
        let layout = TableLayout {
            row_key: params
                .row_key
                .unwrap_or_else(|| self.config.table.row_key.clone()),
            ..self.config.table.clone()
        };

        let samples = collect_samples(self.source.as_ref(), &filter, &layout)?;
        let (report, log) = UtilizationReporter::new(&layout.row_key).build_report(&samples);

        json_result(&DriveSpaceResponse { report, log })
    }

    #[tool(
        description = "Compute disk utilization from a raw total size and free space (both in MB). Unreadable values give a zero row."
    )]
    async fn compute_utilization(
        &self,
        Parameters(params): Parameters<ComputeUtilizationParams>,
    ) -> Result<CallToolResult, McpError> {
        let sample = DiskSample {
            element_name: params.element_name.unwrap_or_else(|| "element".to_string()),
            total_size: Some(params.total_size),
            free_space: Some(params.free_space),
        };
        let utilization =
            UtilizationReporter::new(&self.config.table.row_key).compute_utilization(&sample);

        json_result(&utilization)
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for DriveSpaceMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Drive Space MCP Server - reports disk utilization (free space, total size, \
                 utilization percentage) of monitored elements."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Serve over stdio until the client disconnects
pub async fn serve_stdio(server: DriveSpaceMcpServer) -> anyhow::Result<()> {
    tracing::info!("Starting drive_space_mcp MCP Server");

    let service = server.serve(rmcp::transport::stdio()).await?;

    tracing::info!("Server running, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
