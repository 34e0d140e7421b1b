//! Test notification route

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::AppState;

/// Request to send a test notification
#[derive(Debug, Deserialize)]
pub struct TestRequest {
    /// Channel to test ("email", "sms", ...)
    pub channel: String,
    /// Explicit recipient; overrides the configured list when present
    #[serde(default)]
    pub recipient: Option<String>,
}

/// Result of a test notification
#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub success: bool,
    pub message: String,
}

/// Send a test message on one channel
///
/// Always returns 200 with `{success, message}`; a disabled or unknown
/// channel is a failed test, not an HTTP error.
pub async fn send_test(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TestRequest>,
) -> Json<TestResponse> {
    info!(
        "Test notification requested on '{}' (recipient: {:?})",
        request.channel, request.recipient
    );

    let Some(config) = state.gate.config(&request.channel) else {
        return Json(TestResponse {
            success: false,
            message: format!("Unknown channel '{}'", request.channel),
        });
    };

    if !config.enabled {
        return Json(TestResponse {
            success: false,
            message: format!(
                "Channel '{}' not enabled - check transport credentials",
                request.channel
            ),
        });
    }

    let Some(notifier) = state.notifier(&request.channel) else {
        return Json(TestResponse {
            success: false,
            message: format!("No transport wired for channel '{}'", request.channel),
        });
    };

    let (success, message) = notifier
        .send_test(&config.recipients, request.recipient.as_deref())
        .await;
    Json(TestResponse { success, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::app_state;

    #[tokio::test]
    async fn test_enabled_channel_reports_success() {
        let state = app_state();
        let Json(response) = send_test(
            State(state),
            Json(TestRequest {
                channel: "email".to_string(),
                recipient: None,
            }),
        )
        .await;
        assert!(response.success);
        assert!(response.message.contains("successfully"));
    }

    #[tokio::test]
    async fn test_disabled_channel_reports_failure_with_message() {
        let state = app_state();
        let Json(response) = send_test(
            State(state),
            Json(TestRequest {
                channel: "sms".to_string(),
                recipient: None,
            }),
        )
        .await;
        assert!(!response.success);
        assert!(response.message.contains("not enabled"));
    }

    #[tokio::test]
    async fn test_unknown_channel_reports_failure() {
        let state = app_state();
        let Json(response) = send_test(
            State(state),
            Json(TestRequest {
                channel: "pager".to_string(),
                recipient: None,
            }),
        )
        .await;
        assert!(!response.success);
        assert!(response.message.contains("Unknown channel"));
    }

    #[tokio::test]
    async fn test_explicit_recipient_used() {
        let state = app_state();
        let Json(response) = send_test(
            State(state),
            Json(TestRequest {
                channel: "email".to_string(),
                recipient: Some("oncall@example.com".to_string()),
            }),
        )
        .await;
        assert!(response.success);
    }
}
