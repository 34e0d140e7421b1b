//! Push-based sensor readings
//!
//! Field devices (e.g. an ESP32 temperature/smoke node) push opaque JSON
//! payloads over whatever transport the deployment uses. The listener parses
//! each payload into a field map; malformed payloads are dropped and logged,
//! never terminating the source.

use serde_json::{Map, Value};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Parsed sensor reading: a field → value mapping
///
/// Ephemeral, like a video frame. Field names come from the device firmware
/// (at minimum a numeric temperature-like field).
#[derive(Debug, Clone)]
pub struct SensorReading {
    fields: Map<String, Value>,
}

impl SensorReading {
    /// Parse an opaque payload into a reading
    ///
    /// Accepts any JSON object; anything else is a parse failure.
    pub fn parse(payload: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(fields)) => Some(Self { fields }),
            Ok(other) => {
                warn!("Dropping non-object sensor payload: {}", other);
                None
            }
            Err(e) => {
                warn!("Dropping malformed sensor payload: {}", e);
                None
            }
        }
    }

    /// Numeric value of a field, if present and numeric
    pub fn numeric(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(Value::as_f64)
    }

    /// Number of fields in the reading
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the reading carries no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A reading paired with the raw payload it was parsed from
///
/// The raw payload is relayed verbatim to live subscribers; the parsed
/// reading feeds threshold rules.
#[derive(Debug, Clone)]
pub struct PushedReading {
    /// Raw payload as received from the transport
    pub raw: String,
    /// Parsed field map
    pub reading: SensorReading,
}

/// Handle the transport boundary uses to push payloads in
#[derive(Clone)]
pub struct SensorIngest {
    tx: mpsc::Sender<String>,
}

impl SensorIngest {
    /// Push one opaque payload; returns false if the listener is gone
    pub async fn push(&self, payload: String) -> bool {
        self.tx.send(payload).await.is_ok()
    }
}

/// Push reading source
///
/// Consumes payloads from the ingest handle, parsing each one. The sequence
/// ends when every ingest handle is dropped or shutdown is signalled.
pub struct SensorListener {
    rx: mpsc::Receiver<String>,
    shutdown: watch::Receiver<bool>,
    dropped: u64,
}

impl SensorListener {
    /// Create a listener and its ingest handle
    pub fn channel(capacity: usize, shutdown: watch::Receiver<bool>) -> (SensorIngest, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            SensorIngest { tx },
            Self {
                rx,
                shutdown,
                dropped: 0,
            },
        )
    }

    /// Next well-formed reading, or None when the source ends
    ///
    /// Malformed payloads are dropped internally and do not surface here.
    pub async fn next(&mut self) -> Option<PushedReading> {
        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    // A dropped sender means nobody is left to run the pipeline.
                    if changed.is_err() || *self.shutdown.borrow() {
                        debug!("Sensor listener shutting down");
                        return None;
                    }
                }
                payload = self.rx.recv() => {
                    let raw = payload?;
                    match SensorReading::parse(&raw) {
                        Some(reading) => return Some(PushedReading { raw, reading }),
                        None => {
                            self.dropped += 1;
                        }
                    }
                }
            }
        }
    }

    /// Count of payloads dropped as malformed
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
