//! Error types for a reporting run
//!
//! Unreadable disk samples are not errors; they become zero rows in the
//! report. Everything here ends the run.

use rmcp::ErrorData as McpError;

#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    /// Reading the element source failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The inventory document could not be parsed
    #[error("invalid inventory: {0}")]
    Inventory(#[source] serde_json::Error),

    /// A call or report could not be serialized
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Configuration is inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// No active element is available to receive the report
    #[error("no active '{protocol}' element found to receive the report")]
    ConsumerNotFound { protocol: String },

    /// The message transport rejected or failed to send the call
    #[error("message transport failed: {0}")]
    Transport(String),

    /// The results dialog was closed without being dismissed
    #[error("user detached from the results dialog")]
    UserDetached,
}

pub type ReporterResult<T> = Result<T, ReporterError>;

impl From<reqwest::Error> for ReporterError {
    fn from(err: reqwest::Error) -> Self {
        ReporterError::Transport(err.to_string())
    }
}

impl From<ReporterError> for McpError {
    fn from(err: ReporterError) -> Self {
        McpError::internal_error(err.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_not_found_names_protocol() {
        let err = ReporterError::ConsumerNotFound {
            protocol: "Skyline Health Check Manager".into(),
        };
        assert!(err.to_string().contains("Skyline Health Check Manager"));
    }

    #[test]
    fn test_into_mcp_error() {
        let err: McpError = ReporterError::Transport("connection refused".into()).into();
        assert!(err.message.contains("connection refused"));
    }
}
