//! Channel configuration and cooldown state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Static configuration of one notification channel
///
/// Loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Whether the channel participates in gating at all
    pub enabled: bool,
    /// Whether transport credentials were provided
    ///
    /// A channel without credentials loads with `enabled = false`; status
    /// reports both bits separately so operators can tell "switched off"
    /// from "never configured".
    pub configured: bool,
    /// Recipient list, in configured order; entries are trimmed and empties
    /// skipped at dispatch time, not here
    pub recipients: Vec<String>,
    /// Verdict category that can trigger this channel
    pub trigger_category: String,
    /// Inclusive confidence threshold, 0–100
    pub confidence_threshold: f64,
    /// Minimum interval between two fired alerts
    pub cooldown: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            configured: false,
            recipients: Vec::new(),
            trigger_category: "Fire".to_string(),
            confidence_threshold: 55.0,
            cooldown: Duration::from_secs(300),
        }
    }
}

impl ChannelConfig {
    /// Count of usable recipients (non-empty after trimming)
    pub fn recipient_count(&self) -> usize {
        self.recipients
            .iter()
            .filter(|r| !r.trim().is_empty())
            .count()
    }
}

/// Mutable cooldown state of one channel
///
/// Mutated only by the gate, under that channel's lock. `alert_count` is
/// monotonically non-decreasing and increments exactly once per fired alert;
/// suppressed evaluations never touch either field.
#[derive(Debug, Clone, Default)]
pub struct ChannelState {
    /// Monotonic instant of the last fired alert, for cooldown arithmetic
    pub last_fired: Option<Instant>,
    /// Wall-clock time of the last fired alert, for display
    pub last_alert_at: Option<DateTime<Utc>>,
    /// Total alerts fired on this channel since startup
    pub alert_count: u64,
}

/// Read-only snapshot of a channel's configuration and counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStatus {
    pub enabled: bool,
    pub configured: bool,
    pub recipient_count: usize,
    pub last_alert_time: Option<DateTime<Utc>>,
    pub alert_count: u64,
    pub cooldown_seconds: u64,
    pub confidence_threshold: f64,
    pub trigger_category: String,
}
