//! Broadcast event payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Broadcast topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Verdict updates from classification/parsing
    Detection,
    /// Raw sensor payloads forwarded verbatim
    SensorRelay,
    /// Fired alert events
    Alert,
}

/// Alert severity shown to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Map a confidence percentage to a display severity
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 90.0 {
            Self::Critical
        } else if confidence >= 80.0 {
            Self::High
        } else if confidence >= 65.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One verdict pushed to live observers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictUpdate {
    pub category: String,
    pub confidence: f64,
    pub observed_at: DateTime<Utc>,
}

/// One fired alert pushed to live observers
///
/// Partial delivery failures are surfaced here rather than only logged:
/// observers see how many recipients were attempted and which ones failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertNotice {
    pub channel: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: String,
    pub confidence: f64,
    pub alert_number: u64,
    pub recipients_attempted: usize,
    pub recipients_succeeded: usize,
    pub failed_recipients: Vec<String>,
    pub raised_at: DateTime<Utc>,
}

/// Event flowing through the hub
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload", rename_all = "snake_case")]
pub enum Event {
    Detection(VerdictUpdate),
    SensorRelay(serde_json::Value),
    Alert(AlertNotice),
}

impl Event {
    /// Topic of this event
    pub fn topic(&self) -> Topic {
        match self {
            Self::Detection(_) => Topic::Detection,
            Self::SensorRelay(_) => Topic::SensorRelay,
            Self::Alert(_) => Topic::Alert,
        }
    }
}
