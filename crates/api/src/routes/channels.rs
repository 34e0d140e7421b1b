//! Channel status routes

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::AppState;
use alerting::ChannelStatus;

/// Response for the channel status endpoint
///
/// One snapshot per channel; always succeeds and never blocks on an
/// in-flight evaluation for longer than the channel's state lock.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub channels: BTreeMap<String, ChannelStatus>,
}

/// Get the status snapshot of every channel
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let channels = state
        .gate
        .channel_names()
        .into_iter()
        .filter_map(|name| {
            let snapshot = state.gate.snapshot(&name)?;
            Some((name, snapshot))
        })
        .collect();

    Json(StatusResponse { channels })
}
