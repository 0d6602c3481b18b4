//! Message delivery to the health-check consumer

use crate::error::ReporterResult;
use crate::types::{Destination, DiskInfoMessage, InterAppCall, Message, UtilizationReport};

use super::MessageTransport;

/// Sends the report as a single `DiskInfo` message
pub struct MessageDelivery {
    transport: Box<dyn MessageTransport>,
    destination: Destination,
    source: String,
}

impl MessageDelivery {
    pub fn new(
        transport: Box<dyn MessageTransport>,
        destination: Destination,
        source: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            destination,
            source: source.into(),
        }
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// Build the call for a report
    pub fn call_for(&self, report: &UtilizationReport) -> InterAppCall {
        InterAppCall::new(self.source.clone(), self.destination)
            .with_message(Message::DiskInfo(DiskInfoMessage::from(report)))
    }

    /// Hand the report to the transport; no reply is awaited
    pub async fn deliver(self, report: &UtilizationReport) -> ReporterResult<()> {
        let call = self.call_for(report);
        self.transport.send(&call).await?;

        tracing::info!(
            agent_id = self.destination.agent_id,
            element_id = self.destination.element_id,
            receiver_pid = self.destination.receiver_pid,
            elements = report.len(),
            "disk report sent"
        );
        Ok(())
    }
}
