//! Hazard Monitoring API Server
//!
//! REST and WebSocket surface over the pipeline: channel status snapshots,
//! test notifications, sensor payload ingest, and live event streaming.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub mod pipeline;
pub mod routes;
pub mod settings;
pub mod ws;

use alerting::AlertGate;
use broadcast::Hub;
use capture::SensorIngest;
use notify::Notifier;

/// Application context, built once at startup and shared by reference
///
/// Replaces the module-level singletons of older monitoring stacks: every
/// component hangs off this struct, so tests can assemble a state with mock
/// channels and the gate stays isolated from globals.
pub struct AppState {
    /// Alert gate over all configured channels
    pub gate: AlertGate,
    /// Broadcast hub feeding live subscribers
    pub hub: Hub,
    /// One notifier per channel name
    pub notifiers: HashMap<String, Arc<Notifier>>,
    /// Handle the sensor ingest route pushes payloads into
    pub ingest: SensorIngest,
    /// Station label carried into alert messages
    pub location: String,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Shutdown signal for the source tasks
    pub shutdown: watch::Sender<bool>,
}

impl AppState {
    /// Notifier for a channel, if one is registered
    pub fn notifier(&self, channel: &str) -> Option<&Arc<Notifier>> {
        self.notifiers.get(channel)
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub subscribers: usize,
    pub channels: Vec<String>,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/channels/status", get(routes::channels::get_status))
        .route(
            "/api/v1/notifications/test",
            post(routes::notifications::send_test),
        )
        .route("/api/v1/sensors/ingest", post(routes::sensors::ingest))
        .route("/ws", get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        subscribers: state.hub.subscriber_count(),
        channels: state.gate.channel_names(),
    };

    (StatusCode::OK, Json(response))
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    // Err means a subscriber is already installed; keep the existing one.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use alerting::ChannelConfig;
    use notify::{ConsoleTransport, RetryPolicy};
    use std::time::Duration;

    /// Assemble an AppState with one enabled email channel
    pub fn app_state() -> Arc<AppState> {
        app_state_with_listener().0
    }

    /// Same, keeping the sensor listener alive for ingest tests
    pub fn app_state_with_listener() -> (Arc<AppState>, capture::SensorListener) {
        let mut gate = AlertGate::new();
        gate.add_channel(
            "email",
            ChannelConfig {
                enabled: true,
                configured: true,
                recipients: vec!["ops@example.com".to_string()],
                trigger_category: "Fire".to_string(),
                confidence_threshold: 70.0,
                cooldown: Duration::from_secs(300),
            },
        );
        gate.add_channel("sms", ChannelConfig::default());

        let (shutdown, shutdown_rx) = watch::channel(false);
        let (ingest, listener) = capture::SensorListener::channel(8, shutdown_rx);

        let mut notifiers = HashMap::new();
        for name in ["email", "sms"] {
            notifiers.insert(
                name.to_string(),
                Arc::new(Notifier::new(
                    name,
                    Arc::new(ConsoleTransport::new(if name == "email" {
                        "email"
                    } else {
                        "sms"
                    })),
                    RetryPolicy::none(),
                )),
            );
        }

        let state = Arc::new(AppState {
            gate,
            hub: Hub::new(),
            notifiers,
            ingest,
            location: "Camera Station 1".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            shutdown,
        });
        (state, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_channels() {
        let state = test_support::app_state();
        let response = health_handler(State(Arc::clone(&state))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.gate.channel_names(), vec!["email", "sms"]);
    }
}
