//! Sensor ingest route
//!
//! The concrete push transport boundary: field devices (or a gateway in
//! front of them) POST opaque payloads here; the pipeline's sensor listener
//! does the parsing and dropping.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::AppState;

/// Ingest acknowledgement
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub accepted: bool,
}

/// Accept one pushed sensor payload
///
/// The body is forwarded verbatim; malformed payloads are accepted here and
/// dropped by the listener (ParseFailure is local to the source, not an
/// HTTP error).
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    body: String,
) -> (StatusCode, Json<IngestResponse>) {
    debug!("Sensor payload received ({} bytes)", body.len());
    let accepted = state.ingest.push(body).await;
    let status = if accepted {
        StatusCode::ACCEPTED
    } else {
        // Listener gone: the sensor source has shut down.
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(IngestResponse { accepted }))
}
