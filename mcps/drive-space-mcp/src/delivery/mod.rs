//! Result delivery
//!
//! A run ends by handing its report to exactly one sink: an interactive
//! dialog when a user is watching, otherwise a message to the health-check
//! consumer.

pub mod interactive;
pub mod message;
pub mod transport;

use serde::Deserialize;

use crate::error::{ReporterError, ReporterResult};
use crate::types::{Destination, Log, UtilizationReport};

pub use interactive::InteractiveDelivery;
pub use message::MessageDelivery;
pub use transport::{HttpTransport, MessageTransport, StdoutTransport};

/// How the delivery sink is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Interactive when stdin is a terminal
    #[default]
    Auto,
    Interactive,
    Message,
}

impl Mode {
    /// Whether this run shows its results to a user
    pub fn resolve(self, stdin_is_terminal: bool) -> bool {
        match self {
            Mode::Auto => stdin_is_terminal,
            Mode::Interactive => true,
            Mode::Message => false,
        }
    }

    /// [`Mode::resolve`] against the process's stdin
    pub fn is_interactive(self) -> bool {
        self.resolve(atty::is(atty::Stream::Stdin))
    }
}

/// The sink selected for a run
pub enum Delivery {
    Interactive(InteractiveDelivery),
    Message(MessageDelivery),
}

/// What a delivery did
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    /// The log was shown and dismissed
    Displayed { lines: usize },
    /// The report was handed to the transport
    Sent {
        destination: Destination,
        elements: usize,
    },
}

impl Delivery {
    pub fn is_interactive(&self) -> bool {
        matches!(self, Delivery::Interactive(_))
    }

    pub async fn deliver(
        self,
        report: UtilizationReport,
        log: Log,
    ) -> ReporterResult<DeliveryOutcome> {
        match self {
            Delivery::Interactive(sink) => {
                // Waiting for the user is blocking I/O; keep it off the runtime threads
                let lines = tokio::task::spawn_blocking(move || sink.deliver(log))
                    .await
                    .map_err(|e| {
                        ReporterError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
                    })??;
                Ok(DeliveryOutcome::Displayed { lines })
            }
            Delivery::Message(sink) => {
                drop(log);
                let destination = sink.destination();
                sink.deliver(&report).await?;
                Ok(DeliveryOutcome::Sent {
                    destination,
                    elements: report.len(),
                })
            }
        }
    }
}
