//! Channel settings loading
//!
//! Channels are configured through the environment (prefix `FIREGUARD`,
//! `__` separator), layered over defaults: email triggers on "Fire" at 55%
//! confidence, SMS at 70%, both with a 5 minute cooldown. A channel whose
//! credential is absent loads disabled; that is expected, not an error.

use crate::{AlertGate, AlertingError, ChannelConfig};
use config::{Config, Environment};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Settings for one channel, as loaded
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSettings {
    /// Comma-separated recipient list
    #[serde(default)]
    pub recipients: String,
    /// Verdict category that triggers the channel
    pub trigger_category: String,
    /// Inclusive confidence threshold, 0–100
    pub confidence_threshold: f64,
    /// Cooldown between fired alerts, seconds
    pub cooldown_seconds: u64,
    /// Transport credential; presence enables the channel
    #[serde(default)]
    pub credential: Option<String>,
}

impl ChannelSettings {
    /// Materialize into the read-only runtime configuration
    pub fn to_channel_config(&self) -> ChannelConfig {
        let configured = self
            .credential
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        ChannelConfig {
            enabled: configured,
            configured,
            recipients: if self.recipients.is_empty() {
                Vec::new()
            } else {
                self.recipients.split(',').map(str::to_string).collect()
            },
            trigger_category: self.trigger_category.clone(),
            confidence_threshold: self.confidence_threshold,
            cooldown: Duration::from_secs(self.cooldown_seconds),
        }
    }
}

/// Settings for the whole alerting layer
#[derive(Debug, Clone, Deserialize)]
pub struct AlertingSettings {
    pub email: ChannelSettings,
    pub sms: ChannelSettings,
}

impl AlertingSettings {
    /// Load from environment over defaults
    pub fn load() -> Result<Self, AlertingError> {
        let cfg = Config::builder()
            .set_default("email.recipients", "")?
            .set_default("email.trigger_category", "Fire")?
            .set_default("email.confidence_threshold", 55.0)?
            .set_default("email.cooldown_seconds", 300)?
            .set_default("sms.recipients", "")?
            .set_default("sms.trigger_category", "Fire")?
            .set_default("sms.confidence_threshold", 70.0)?
            .set_default("sms.cooldown_seconds", 300)?
            .add_source(
                Environment::with_prefix("FIREGUARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Build the alert gate from these settings
    pub fn build_gate(&self) -> AlertGate {
        let mut gate = AlertGate::new();
        gate.add_channel("email", self.email.to_channel_config());
        gate.add_channel("sms", self.sms.to_channel_config());
        for name in gate.channel_names() {
            if let Some(config) = gate.config(&name) {
                if !config.enabled {
                    info!("Channel '{}' disabled - missing credentials", name);
                }
            }
        }
        gate
    }
}
