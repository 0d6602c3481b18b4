//! Configuration loading (.drive-space.toml)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::delivery::Mode;
use crate::logging::LogFormat;
use crate::source::ElementState;
use crate::types::{DEFAULT_RECEIVER_PID, DEFAULT_SOURCE};

pub const CONFIG_FILE: &str = ".drive-space.toml";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/drive-space/
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    let global_path = dirs::config_dir()?.join("drive-space").join(filename);
    global_path.exists().then_some(global_path)
}

/// Top-level reporter configuration
#[derive(Debug, Default, Deserialize)]
pub struct ReporterConfig {
    #[serde(default)]
    pub selection: ElementFilter,
    #[serde(default)]
    pub table: TableLayout,
    #[serde(default)]
    pub consumer: ConsumerConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which elements are reported on
#[derive(Debug, Clone, Deserialize)]
pub struct ElementFilter {
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_state")]
    pub state: ElementState,
}

/// Where the disk values live in each element
#[derive(Debug, Clone, Deserialize)]
pub struct TableLayout {
    #[serde(default = "default_table_id")]
    pub table_id: u32,
    #[serde(default = "default_row_key")]
    pub row_key: String,
    #[serde(default = "default_total_size_column")]
    pub total_size_column: usize,
    #[serde(default = "default_free_space_column")]
    pub free_space_column: usize,
}

/// The health-check consumer receiving non-interactive reports
#[derive(Debug, Clone, Deserialize)]
pub struct ConsumerConfig {
    #[serde(default = "default_consumer_protocol")]
    pub protocol: String,
    /// Explicit destination; both ids must be set to skip the protocol lookup
    pub agent_id: Option<u32>,
    pub element_id: Option<u32>,
    #[serde(default = "default_receiver_pid")]
    pub receiver_pid: u32,
    #[serde(default = "default_source_name")]
    pub source_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Inventory,
    Local,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    /// Inventory snapshot, required for the inventory source
    pub inventory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default)]
    pub mode: Mode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Http,
    Stdout,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    #[serde(default)]
    pub kind: TransportKind,
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<LogFormat>,
}

// Default value functions
fn default_protocol() -> String {
    "Microsoft Platform".to_string()
}

fn default_state() -> ElementState {
    ElementState::Active
}

fn default_table_id() -> u32 {
    170
}

fn default_row_key() -> String {
    "C:".to_string()
}

fn default_total_size_column() -> usize {
    2
}

fn default_free_space_column() -> usize {
    3
}

fn default_consumer_protocol() -> String {
    "Skyline Health Check Manager".to_string()
}

fn default_receiver_pid() -> u32 {
    DEFAULT_RECEIVER_PID
}

fn default_source_name() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ElementFilter {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            state: default_state(),
        }
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            table_id: default_table_id(),
            row_key: default_row_key(),
            total_size_column: default_total_size_column(),
            free_space_column: default_free_space_column(),
        }
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            protocol: default_consumer_protocol(),
            agent_id: None,
            element_id: None,
            receiver_pid: default_receiver_pid(),
            source_name: default_source_name(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::default(),
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ReporterConfig {
    /// Load config from an explicit path, or search for .drive-space.toml
    ///
    /// Falls back to defaults when no file is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(explicit) {
            Some(path) => {
                tracing::debug!("Loading config from: {}", path.display());
                Self::load_from_path(&path)
            }
            None => {
                tracing::debug!("No {} found, using defaults", CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    /// The file [`ReporterConfig::load`] would read, without reading it
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| find_config_file(CONFIG_FILE))
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
