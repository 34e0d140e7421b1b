//! Live event streaming over WebSocket
//!
//! Each connection subscribes to the hub and receives every event as a JSON
//! text frame until it disconnects. A subscriber that lags behind the hub's
//! capacity misses events and keeps going; there is no replay.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::AppState;

/// Upgrade to a websocket and stream hub events
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| stream_events(socket, state))
}

async fn stream_events(socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.hub.subscribe();
    let (mut sink, mut stream) = socket.split();
    debug!(
        "Subscriber connected ({} live)",
        state.hub.subscriber_count()
    );

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let Ok(text) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if sink.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!("Subscriber lagged, {} event(s) missed", missed);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                // Clients only ping; any close or error ends the session.
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    debug!("Subscriber disconnected");
}
