//! Wire types sent to the health-check consumer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UtilizationReport;

/// Inter-app receiver parameter on the health-check consumer
pub const DEFAULT_RECEIVER_PID: u32 = 9_000_000;

/// Source name stamped on every call
pub const DEFAULT_SOURCE: &str = "C Drive Free Space";

/// Disk results in the shape the consumer expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiskInfoMessage {
    pub name: Vec<String>,
    pub free_disk: Vec<i64>,
    pub size: Vec<i64>,
    pub result_percentage: Vec<f64>,
}

impl From<&UtilizationReport> for DiskInfoMessage {
    fn from(report: &UtilizationReport) -> Self {
        Self {
            name: report.names().to_vec(),
            free_disk: report.free_space().to_vec(),
            size: report.total_size().to_vec(),
            result_percentage: report.utilization_percent().to_vec(),
        }
    }
}

/// Message types known to the consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum Message {
    DiskInfo(DiskInfoMessage),
}

/// Where a call is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub agent_id: u32,
    pub element_id: u32,
    pub receiver_pid: u32,
}

/// One inter-app call carrying a batch of messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterAppCall {
    pub source: String,
    pub sent_at: DateTime<Utc>,
    pub destination: Destination,
    pub messages: Vec<Message>,
}

impl InterAppCall {
    pub fn new(source: impl Into<String>, destination: Destination) -> Self {
        Self {
            source: source.into(),
            sent_at: Utc::now(),
            destination,
            messages: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_info_uses_consumer_field_names() {
        let message = Message::DiskInfo(DiskInfoMessage {
            name: vec!["dma-01".into()],
            free_disk: vec![250],
            size: vec![1000],
            result_percentage: vec![75.0],
        });

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["Type"], "DiskInfo");
        assert_eq!(value["Name"], serde_json::json!(["dma-01"]));
        assert_eq!(value["FreeDisk"], serde_json::json!([250]));
        assert_eq!(value["Size"], serde_json::json!([1000]));
        assert_eq!(value["ResultPercentage"], serde_json::json!([75.0]));
    }

    #[test]
    fn test_call_carries_destination() {
        let destination = Destination {
            agent_id: 12,
            element_id: 34,
            receiver_pid: DEFAULT_RECEIVER_PID,
        };
        let call = InterAppCall::new(DEFAULT_SOURCE, destination);

        let value = serde_json::to_value(&call).unwrap();
        assert_eq!(value["source"], "C Drive Free Space");
        assert_eq!(value["destination"]["agentId"], 12);
        assert_eq!(value["destination"]["receiverPid"], 9_000_000);
        assert!(value["messages"].as_array().unwrap().is_empty());
    }
}
