//! Tracing setup
//!
//! Logs always go to stderr: stdout carries MCP traffic in `serve` mode and
//! the JSON call when the stdout transport is used.

use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// `LOG_FORMAT=json` selects JSON output
    pub fn from_env() -> Option<Self> {
        std::env::var("LOG_FORMAT")
            .ok()
            .map(|v| Self::parse(&v))
    }

    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Initialize tracing for the given crate
///
/// Filtering comes from `RUST_LOG`, with `<crate_name>=info` added. The
/// environment's `LOG_FORMAT` overrides the configured format.
pub fn init_tracing(crate_name: &str, configured: Option<LogFormat>) -> anyhow::Result<()> {
    let directive = format!("{}=info", crate_name);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let format = LogFormat::from_env().or(configured).unwrap_or_default();
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?,
    }

    Ok(())
}
