//! Reading Sources for the Hazard Monitoring Pipeline
//!
//! Two source variants feed the pipeline:
//! - Polled: a camera grabbed at a fixed cadence (default 10 Hz)
//! - Push: sensor payloads arriving asynchronously from field devices
//!
//! Both produce lazy, unbounded, non-restartable reading sequences.

pub mod frame;
pub mod sensor;
pub mod source;

pub use frame::VideoFrame;
pub use sensor::{PushedReading, SensorIngest, SensorListener, SensorReading};
pub use source::{FrameSource, PolledCamera, PollConfig};

use thiserror::Error;

/// Capture error types
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to open capture device: {0}")]
    Open(String),

    #[error("Frame grab failed: {0}")]
    Grab(String),

    #[error("Frame decode failed: {0}")]
    Decode(String),

    #[error("Capture device closed")]
    Closed,
}
