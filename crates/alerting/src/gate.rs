//! Fire/suppress decision engine

use crate::{ChannelConfig, ChannelState, ChannelStatus};
use chrono::{DateTime, Utc};
use detection::Verdict;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of one gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Alert fired; state was updated before this was returned
    Fired {
        /// Running alert number on this channel (1-based)
        alert_number: u64,
    },
    /// No alert; state untouched, caller must not dispatch
    Suppressed(SuppressReason),
}

impl GateDecision {
    /// Whether the decision is a fire
    pub fn fired(&self) -> bool {
        matches!(self, Self::Fired { .. })
    }
}

/// Why an evaluation did not fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// No channel registered under that name
    UnknownChannel,
    /// Channel disabled (usually missing credentials)
    Disabled,
    /// Verdict category does not match the channel's trigger
    CategoryMismatch,
    /// Confidence below the channel threshold
    BelowThreshold,
    /// Inside the cooldown window of the previous alert
    Cooldown,
}

struct ChannelEntry {
    config: ChannelConfig,
    // Per-channel lock: two channels may fire concurrently, evaluations on
    // one channel are serialized.
    state: Mutex<ChannelState>,
}

/// Stateful alert gate over a fixed set of channels
///
/// Built once at startup from loaded configuration and shared by reference;
/// evaluation takes `&self`.
pub struct AlertGate {
    channels: HashMap<String, ChannelEntry>,
}

impl AlertGate {
    /// Create an empty gate
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
        }
    }

    /// Register a channel; replaces any previous channel of the same name
    pub fn add_channel(&mut self, name: impl Into<String>, config: ChannelConfig) {
        let name = name.into();
        info!(
            "Registering alert channel '{}': enabled={}, trigger={}, threshold={}, cooldown={}s",
            name,
            config.enabled,
            config.trigger_category,
            config.confidence_threshold,
            config.cooldown.as_secs()
        );
        self.channels.insert(
            name,
            ChannelEntry {
                config,
                state: Mutex::new(ChannelState::default()),
            },
        );
    }

    /// Registered channel names, sorted for stable iteration
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Configuration of a channel, if registered
    pub fn config(&self, channel: &str) -> Option<&ChannelConfig> {
        self.channels.get(channel).map(|e| &e.config)
    }

    /// Evaluate a verdict against a channel at the current time
    pub fn evaluate(&self, channel: &str, verdict: &Verdict) -> GateDecision {
        self.evaluate_at(Instant::now(), Utc::now(), channel, verdict)
    }

    /// Evaluate at an explicit instant (deterministic variant for tests)
    ///
    /// All four conditions must hold to fire: channel enabled, category
    /// match, confidence at or above threshold (inclusive), and cooldown
    /// expired (inclusive at the boundary). On fire the state transition
    /// happens here, before any notification is dispatched, so a second
    /// concurrent evaluation inside the same window is guaranteed to see
    /// the updated `last_fired` and suppress.
    pub fn evaluate_at(
        &self,
        now: Instant,
        wall: DateTime<Utc>,
        channel: &str,
        verdict: &Verdict,
    ) -> GateDecision {
        let Some(entry) = self.channels.get(channel) else {
            return GateDecision::Suppressed(SuppressReason::UnknownChannel);
        };

        if !entry.config.enabled {
            return GateDecision::Suppressed(SuppressReason::Disabled);
        }
        if verdict.category != entry.config.trigger_category {
            return GateDecision::Suppressed(SuppressReason::CategoryMismatch);
        }
        if verdict.confidence < entry.config.confidence_threshold {
            debug!(
                "Alert suppressed on '{}': confidence {} < threshold {}",
                channel, verdict.confidence, entry.config.confidence_threshold
            );
            return GateDecision::Suppressed(SuppressReason::BelowThreshold);
        }

        let mut state = entry
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(last) = state.last_fired {
            if now.saturating_duration_since(last) < entry.config.cooldown {
                debug!("Alert suppressed on '{}': cooldown active", channel);
                return GateDecision::Suppressed(SuppressReason::Cooldown);
            }
        }

        state.last_fired = Some(now);
        state.last_alert_at = Some(wall);
        state.alert_count += 1;
        info!(
            "Alert fired on '{}': {} at {:.1}% (alert #{})",
            channel, verdict.category, verdict.confidence, state.alert_count
        );
        GateDecision::Fired {
            alert_number: state.alert_count,
        }
    }

    /// Status snapshot of a channel
    ///
    /// Pure read; never fails for a registered channel. Safe to call while
    /// an evaluation is in flight (observability path, not control path).
    pub fn snapshot(&self, channel: &str) -> Option<ChannelStatus> {
        let entry = self.channels.get(channel)?;
        let state = entry
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Some(ChannelStatus {
            enabled: entry.config.enabled,
            configured: entry.config.configured,
            recipient_count: entry.config.recipient_count(),
            last_alert_time: state.last_alert_at,
            alert_count: state.alert_count,
            cooldown_seconds: entry.config.cooldown.as_secs(),
            confidence_threshold: entry.config.confidence_threshold,
            trigger_category: entry.config.trigger_category.clone(),
        })
    }
}

impl Default for AlertGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const FIVE_MIN: Duration = Duration::from_secs(300);

    fn fire_channel() -> ChannelConfig {
        ChannelConfig {
            enabled: true,
            configured: true,
            recipients: vec!["ops@example.com".to_string()],
            trigger_category: "Fire".to_string(),
            confidence_threshold: 70.0,
            cooldown: FIVE_MIN,
        }
    }

    fn gate_with(name: &str, config: ChannelConfig) -> AlertGate {
        let mut gate = AlertGate::new();
        gate.add_channel(name, config);
        gate
    }

    fn verdict(category: &str, confidence: f64) -> Verdict {
        Verdict::now(category, confidence)
    }

    #[test]
    fn test_category_mismatch_suppresses_without_state_change() {
        let gate = gate_with("email", fire_channel());
        let decision = gate.evaluate("email", &verdict("Smoke", 95.0));
        assert_eq!(
            decision,
            GateDecision::Suppressed(SuppressReason::CategoryMismatch)
        );
        let status = gate.snapshot("email").unwrap();
        assert_eq!(status.alert_count, 0);
        assert!(status.last_alert_time.is_none());
    }

    #[test]
    fn test_below_threshold_suppresses() {
        let gate = gate_with("email", fire_channel());
        let decision = gate.evaluate("email", &verdict("Fire", 69.9));
        assert_eq!(
            decision,
            GateDecision::Suppressed(SuppressReason::BelowThreshold)
        );
        assert_eq!(gate.snapshot("email").unwrap().alert_count, 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let gate = gate_with("email", fire_channel());
        assert!(gate.evaluate("email", &verdict("Fire", 70.0)).fired());
    }

    #[test]
    fn test_disabled_channel_always_suppresses() {
        let config = ChannelConfig {
            enabled: false,
            ..fire_channel()
        };
        let gate = gate_with("sms", config);
        assert_eq!(
            gate.evaluate("sms", &verdict("Fire", 99.0)),
            GateDecision::Suppressed(SuppressReason::Disabled)
        );
    }

    #[test]
    fn test_unknown_channel_suppresses() {
        let gate = AlertGate::new();
        assert_eq!(
            gate.evaluate("pager", &verdict("Fire", 99.0)),
            GateDecision::Suppressed(SuppressReason::UnknownChannel)
        );
    }

    #[test]
    fn test_cooldown_window_scenario() {
        // threshold 70, cooldown 5min; stream at t=0, t=1min, t=6min.
        let gate = gate_with("email", fire_channel());
        let t0 = Instant::now();
        let wall = Utc::now();

        let d0 = gate.evaluate_at(t0, wall, "email", &verdict("Fire", 80.0));
        assert_eq!(d0, GateDecision::Fired { alert_number: 1 });

        let d1 = gate.evaluate_at(
            t0 + Duration::from_secs(60),
            wall,
            "email",
            &verdict("Fire", 90.0),
        );
        assert_eq!(d1, GateDecision::Suppressed(SuppressReason::Cooldown));

        let d2 = gate.evaluate_at(
            t0 + Duration::from_secs(360),
            wall,
            "email",
            &verdict("Fire", 85.0),
        );
        assert_eq!(d2, GateDecision::Fired { alert_number: 2 });

        assert_eq!(gate.snapshot("email").unwrap().alert_count, 2);
    }

    #[test]
    fn test_fire_allowed_exactly_at_cooldown_expiry() {
        let gate = gate_with("email", fire_channel());
        let t0 = Instant::now();
        let wall = Utc::now();

        assert!(gate.evaluate_at(t0, wall, "email", &verdict("Fire", 80.0)).fired());
        assert!(gate
            .evaluate_at(t0 + FIVE_MIN, wall, "email", &verdict("Fire", 80.0))
            .fired());
    }

    #[test]
    fn test_suppressed_evaluation_leaves_snapshot_unchanged() {
        let gate = gate_with("email", fire_channel());
        let t0 = Instant::now();
        let wall = Utc::now();
        gate.evaluate_at(t0, wall, "email", &verdict("Fire", 80.0));

        let before = gate.snapshot("email").unwrap();
        gate.evaluate_at(
            t0 + Duration::from_secs(10),
            Utc::now(),
            "email",
            &verdict("Fire", 95.0),
        );
        let after = gate.snapshot("email").unwrap();

        assert_eq!(before.alert_count, after.alert_count);
        assert_eq!(before.last_alert_time, after.last_alert_time);
    }

    #[test]
    fn test_channels_fire_independently() {
        let mut gate = AlertGate::new();
        gate.add_channel("email", fire_channel());
        gate.add_channel(
            "sms",
            ChannelConfig {
                confidence_threshold: 90.0,
                ..fire_channel()
            },
        );

        let v = verdict("Fire", 92.0);
        assert!(gate.evaluate("email", &v).fired());
        assert!(gate.evaluate("sms", &v).fired());
        assert_eq!(gate.snapshot("email").unwrap().alert_count, 1);
        assert_eq!(gate.snapshot("sms").unwrap().alert_count, 1);
    }

    #[test]
    fn test_at_most_one_fire_per_window_under_concurrency() {
        use std::sync::Arc;

        let gate = Arc::new(gate_with("email", fire_channel()));
        let t0 = Instant::now();
        let wall = Utc::now();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gate = Arc::clone(&gate);
            handles.push(std::thread::spawn(move || {
                gate.evaluate_at(t0, wall, "email", &Verdict::now("Fire", 88.0))
                    .fired()
            }));
        }

        let fired = handles
            .into_iter()
            .filter_map(|h| h.join().ok())
            .filter(|fired| *fired)
            .count();
        assert_eq!(fired, 1);
        assert_eq!(gate.snapshot("email").unwrap().alert_count, 1);
    }
}
