//! Server and pipeline settings
//!
//! Loaded from the environment (prefix `FIREGUARD`, `__` separator) over
//! defaults, same layering as the channel settings in the alerting crate.

use config::{Config, ConfigError, Environment};
use detection::SensorRule;
use serde::Deserialize;
use std::time::Duration;

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Bind address, e.g. "0.0.0.0:8080"
    pub bind_addr: String,
}

/// Pipeline settings
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// Camera poll interval in milliseconds (10 Hz default)
    pub poll_interval_ms: u64,
    /// Station label carried into alert messages
    pub location: String,
    /// Whether to run the polled camera loop
    pub camera_enabled: bool,
}

impl PipelineSettings {
    /// Poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Full application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub pipeline: PipelineSettings,
    /// Threshold rule applied to pushed sensor readings
    pub sensor: SensorRule,
}

impl Settings {
    /// Load from environment over defaults
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            .set_default("server.bind_addr", "0.0.0.0:8080")?
            .set_default("pipeline.poll_interval_ms", 100)?
            .set_default("pipeline.location", "Camera Station 1")?
            .set_default("pipeline.camera_enabled", true)?
            .set_default("sensor.field", "temperature")?
            .set_default("sensor.threshold", 55.0)?
            .set_default("sensor.category", "Fire")?
            .add_source(
                Environment::with_prefix("FIREGUARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        cfg.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load() {
        let settings = Settings::load().unwrap();
        assert_eq!(settings.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.pipeline.poll_interval(), Duration::from_millis(100));
        assert_eq!(settings.sensor.field, "temperature");
    }
}
