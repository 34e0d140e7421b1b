//! Pipeline wiring
//!
//! One background task per reading source. Each task classifies or parses
//! its own readings and drives the gate, notifier, and hub synchronously —
//! a fired alert's notifications are dispatched from the task that produced
//! the triggering reading, after the gate has already committed the state
//! transition.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::AppState;
use alerting::GateDecision;
use broadcast::{AlertNotice, Event, Severity, VerdictUpdate};
use capture::{CaptureError, FrameSource, PolledCamera, SensorListener, VideoFrame};
use detection::{Classifier, SensorRule, Verdict};
use notify::alert_message;

/// Run the polled camera source until shutdown or a fatal grab error
///
/// A single grab failure terminates this source only (SourceFailure is
/// local); the sensor loop and the server keep running.
pub async fn run_camera_loop<S: FrameSource>(
    state: Arc<AppState>,
    classifier: Arc<dyn Classifier>,
    mut camera: PolledCamera<S>,
) {
    info!("Camera source started");
    loop {
        match camera.next().await {
            Ok(Some(frame)) => match classifier.classify(&frame) {
                Ok(verdict) => process_verdict(&state, &verdict).await,
                Err(e) => warn!("Classification failed, frame dropped: {}", e),
            },
            Ok(None) => {
                info!("Camera source stopped by shutdown signal");
                break;
            }
            Err(e) => {
                error!("Fatal camera source failure: {}", e);
                break;
            }
        }
    }
}

/// Run the push sensor source until its ingest side closes or shutdown
pub async fn run_sensor_loop(state: Arc<AppState>, rule: SensorRule, mut listener: SensorListener) {
    info!(
        "Sensor source started (rule: {} >= {} -> {})",
        rule.field, rule.threshold, rule.category
    );
    while let Some(pushed) = listener.next().await {
        // Relay the raw payload to observers regardless of the rule.
        let relayed = serde_json::from_str(&pushed.raw)
            .unwrap_or_else(|_| serde_json::Value::String(pushed.raw.clone()));
        state.hub.publish(Event::SensorRelay(relayed));

        if let Some(verdict) = rule.apply(&pushed.reading) {
            process_verdict(&state, &verdict).await;
        }
    }
    info!("Sensor source stopped");
}

/// Broadcast a verdict and run it through every channel's gate
pub async fn process_verdict(state: &AppState, verdict: &Verdict) {
    state.hub.publish(Event::Detection(VerdictUpdate {
        category: verdict.category.clone(),
        confidence: verdict.confidence,
        observed_at: verdict.observed_at,
    }));

    for channel in state.gate.channel_names() {
        let GateDecision::Fired { alert_number } = state.gate.evaluate(&channel, verdict) else {
            continue;
        };

        let Some(notifier) = state.notifier(&channel) else {
            warn!("Channel '{}' fired but has no transport wired", channel);
            continue;
        };
        let recipients = state
            .gate
            .config(&channel)
            .map(|c| c.recipients.clone())
            .unwrap_or_default();

        let message = alert_message(
            &verdict.category,
            verdict.confidence,
            &state.location,
            alert_number,
            verdict.observed_at,
        );
        let result = notifier.dispatch(&recipients, &message.body).await;

        if !result.delivered() {
            warn!(
                "Alert #{} on '{}' fired but no recipient was reached",
                alert_number, channel
            );
        }

        state.hub.publish(Event::Alert(AlertNotice {
            channel: channel.clone(),
            title: message.title,
            description: message.body,
            severity: Severity::from_confidence(verdict.confidence),
            category: verdict.category.clone(),
            confidence: verdict.confidence,
            alert_number,
            recipients_attempted: result.attempted,
            recipients_succeeded: result.succeeded,
            failed_recipients: result.failed_recipients,
            raised_at: verdict.observed_at,
        }));
    }
}

/// Synthetic capture device producing solid-gray frames
///
/// Used when no camera driver is wired in, keeping the polled path live so
/// the classifier seam and gating can be exercised end to end.
pub struct StaticFrameDevice {
    width: u32,
    height: u32,
}

impl StaticFrameDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for StaticFrameDevice {
    fn default() -> Self {
        Self::new(224, 224)
    }
}

impl FrameSource for StaticFrameDevice {
    fn grab(&mut self) -> Result<VideoFrame, CaptureError> {
        let pixels = vec![128u8; (self.width * self.height * 3) as usize];
        Ok(VideoFrame::new(pixels, self.width, self.height, 0))
    }
}
