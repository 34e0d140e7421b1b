//! Alert Gating
//!
//! The stateful decision core: given a verdict and a channel's configuration,
//! decide fire or suppress, update cooldown state atomically, and expose
//! read-only status snapshots. Duplicate alerts inside the cooldown window
//! are suppressed even under concurrent evaluation from multiple sources.

mod channel;
mod gate;
mod settings;

pub use channel::{ChannelConfig, ChannelState, ChannelStatus};
pub use gate::{AlertGate, GateDecision, SuppressReason};
pub use settings::{AlertingSettings, ChannelSettings};

use thiserror::Error;

/// Errors from the alerting layer
///
/// The gate itself never fails: evaluation returns a decision and snapshots
/// are best-effort reads. Only configuration loading can error.
#[derive(Debug, Error)]
pub enum AlertingError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
