//! Video frame type and decoding

use crate::CaptureError;
use std::time::{SystemTime, UNIX_EPOCH};

/// Decoded RGB video frame
///
/// Ephemeral: created per grab, handed to the classifier, then dropped.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (epoch milliseconds)
    pub timestamp_ms: i64,
    /// Frame sequence number within the source
    pub sequence: u64,
}

impl VideoFrame {
    /// Create a frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ms: epoch_ms(),
            sequence,
        }
    }

    /// Decode an MJPEG buffer into an RGB frame
    ///
    /// Capture hardware commonly delivers MJPEG; the classifier wants RGB.
    pub fn from_mjpeg(bytes: &[u8], sequence: u64) -> Result<Self, CaptureError> {
        let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)
            .map_err(|e| CaptureError::Decode(e.to_string()))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self::new(rgb.into_raw(), width, height, sequence))
    }

    /// Whether the buffer length matches the declared dimensions
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == (self.width as usize) * (self.height as usize) * 3
    }
}

fn epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
