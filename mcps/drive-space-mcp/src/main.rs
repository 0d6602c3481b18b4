//! Drive Space reporter
//!
//! Reads the drive row of every active monitored element, computes disk
//! utilization and either shows the results (interactive runs) or sends them
//! to the health-check consumer.
//!
//! # Usage
//!
//! ```bash
//! drive-space-mcp run --inventory elements.json --mode message --url http://health/interapp
//! drive-space-mcp run --local --mode interactive
//! drive-space-mcp serve --local
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use drive_space_mcp::config::{SourceKind, TransportConfig, TransportKind};
use drive_space_mcp::delivery::{HttpTransport, MessageTransport, StdoutTransport};
use drive_space_mcp::logging::init_tracing;
use drive_space_mcp::{
    server, Delivery, DriveSpaceMcpServer, ElementSource, InteractiveDelivery, InventorySource,
    LocalDiskSource, Mode, ReporterConfig, Runner,
};

#[derive(Parser)]
#[command(name = "drive-space-mcp")]
#[command(about = "Disk utilization reporter for monitored elements", version)]
struct Cli {
    /// Config file (defaults to searching for .drive-space.toml)
    #[arg(long, short, env = "DRIVE_SPACE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one reporting pass (default)
    Run(RunArgs),
    /// Serve the disk report tools over MCP stdio
    Serve(SourceArgs),
}

#[derive(Args, Default)]
struct RunArgs {
    /// How results are delivered
    #[arg(long, value_enum, env = "DRIVE_SPACE_MODE")]
    mode: Option<Mode>,

    #[command(flatten)]
    source: SourceArgs,

    /// Transport for message delivery
    #[arg(long, value_enum)]
    transport: Option<TransportKind>,

    /// Consumer endpoint for the HTTP transport
    #[arg(long, env = "DRIVE_SPACE_URL")]
    url: Option<String>,
}

#[derive(Args, Default)]
struct SourceArgs {
    /// Inventory snapshot of elements and their tables
    #[arg(long, env = "DRIVE_SPACE_INVENTORY", conflicts_with = "local")]
    inventory: Option<PathBuf>,

    /// Report on this machine's disks instead of an inventory
    #[arg(long)]
    local: bool,
}

impl SourceArgs {
    fn apply(self, config: &mut ReporterConfig) {
        if let Some(path) = self.inventory {
            config.source.kind = SourceKind::Inventory;
            config.source.inventory = Some(path);
        }
        if self.local {
            config.source.kind = SourceKind::Local;
        }
    }
}

impl RunArgs {
    fn apply(self, config: &mut ReporterConfig) {
        if let Some(mode) = self.mode {
            config.delivery.mode = mode;
        }
        if let Some(kind) = self.transport {
            config.transport.kind = kind;
        }
        if let Some(url) = self.url {
            config.transport.url = Some(url);
        }
        self.source.apply(config);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = ReporterConfig::locate(cli.config.as_deref());
    let loaded = match &config_path {
        Some(path) => ReporterConfig::load_from_path(path),
        None => Ok(ReporterConfig::default()),
    };

    // The configured format only applies once the file has parsed
    let format = loaded.as_ref().ok().and_then(|config| config.logging.format);
    init_tracing("drive_space_mcp", format)?;

    match &config_path {
        Some(path) => tracing::debug!("Loading config from: {}", path.display()),
        None => tracing::debug!("No config file found, using defaults"),
    }
    let mut config = loaded.map_err(|e| {
        tracing::error!("Run|Something went wrong: {:#}", e);
        e
    })?;

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            args.apply(&mut config);
            if let Err(e) = run(&config).await {
                tracing::error!("Run|Something went wrong: {:#}", e);
                return Err(e);
            }
        }
        Commands::Serve(args) => {
            args.apply(&mut config);
            let source: Arc<dyn ElementSource> = Arc::from(open_source(&config)?);
            server::serve_stdio(DriveSpaceMcpServer::new(config, source)).await?;
        }
    }

    Ok(())
}

async fn run(config: &ReporterConfig) -> Result<()> {
    let source = open_source(config)?;
    let runner = Runner::new(config, source.as_ref());

    let delivery = if config.delivery.mode.is_interactive() {
        Delivery::Interactive(InteractiveDelivery::stdio())
    } else {
        Delivery::Message(runner.message_delivery(open_transport(&config.transport)?)?)
    };

    let summary = runner.run(delivery).await?;
    tracing::info!(
        elements = summary.elements,
        degraded = summary.degraded,
        outcome = ?summary.outcome,
        "run complete"
    );
    Ok(())
}

fn open_source(config: &ReporterConfig) -> Result<Box<dyn ElementSource>> {
    match config.source.kind {
        SourceKind::Inventory => {
            let path = config.source.inventory.as_deref().context(
                "an inventory file is required: pass --inventory or set [source] inventory",
            )?;
            let source = InventorySource::load(path)
                .with_context(|| format!("loading inventory {}", path.display()))?;
            Ok(Box::new(source))
        }
        SourceKind::Local => Ok(Box::new(LocalDiskSource::new(
            config.selection.protocol.clone(),
        ))),
    }
}

fn open_transport(config: &TransportConfig) -> Result<Box<dyn MessageTransport>> {
    match config.kind {
        TransportKind::Http => {
            let url = config.url.as_deref().context(
                "a consumer URL is required for the HTTP transport: pass --url or set [transport] url",
            )?;
            let transport = HttpTransport::new(url, Duration::from_secs(config.timeout_secs))?;
            Ok(Box::new(transport))
        }
        TransportKind::Stdout => Ok(Box::new(StdoutTransport::new())),
    }
}
