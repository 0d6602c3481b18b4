//! One reporting pass: collect, compute, deliver

use crate::config::ReporterConfig;
use crate::delivery::{Delivery, DeliveryOutcome, MessageDelivery, MessageTransport};
use crate::error::ReporterResult;
use crate::source::{collect_samples, find_consumer, ElementSource};
use crate::types::{Log, UtilizationReport};
use crate::utilization::UtilizationReporter;

/// Result of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub elements: usize,
    /// Rows reported as the zero sentinel
    pub degraded: usize,
    pub outcome: DeliveryOutcome,
}

/// Runs reporting passes against one element source
pub struct Runner<'a> {
    config: &'a ReporterConfig,
    source: &'a dyn ElementSource,
    reporter: UtilizationReporter,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a ReporterConfig, source: &'a dyn ElementSource) -> Self {
        Self {
            config,
            source,
            reporter: UtilizationReporter::new(&config.table.row_key),
        }
    }

    /// Collect samples from the selected elements and build the report
    pub fn collect(&self) -> ReporterResult<(UtilizationReport, Log)> {
        let samples = collect_samples(self.source, &self.config.selection, &self.config.table)?;
        tracing::info!(
            protocol = %self.config.selection.protocol,
            elements = samples.len(),
            "collected disk samples"
        );
        Ok(self.reporter.build_report(&samples))
    }

    /// Message sink addressed to the configured health-check consumer
    pub fn message_delivery(
        &self,
        transport: Box<dyn MessageTransport>,
    ) -> ReporterResult<MessageDelivery> {
        let destination = find_consumer(self.source, &self.config.consumer)?;
        Ok(MessageDelivery::new(
            transport,
            destination,
            self.config.consumer.source_name.clone(),
        ))
    }

    /// Collect, then hand the results to `delivery`
    pub async fn run(&self, delivery: Delivery) -> ReporterResult<RunSummary> {
        let (report, log) = self.collect()?;
        let elements = report.len();
        let degraded = report.total_size().iter().filter(|&&size| size == 0).count();

        if degraded > 0 {
            tracing::warn!(degraded, elements, "some elements had no readable disk data");
        }

        tracing::info!(interactive = delivery.is_interactive(), "delivering disk report");
        let outcome = delivery.deliver(report, log).await?;

        Ok(RunSummary {
            elements,
            degraded,
            outcome,
        })
    }
}
