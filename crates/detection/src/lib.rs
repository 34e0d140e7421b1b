//! Classifier Adapter Boundary
//!
//! The pipeline never sees model internals: frames go in through the
//! `Classifier` trait, normalized verdicts come out. Pushed sensor readings
//! are mapped to synthetic verdicts by threshold rules at this boundary —
//! that mapping is configuration, not classification, and it never leaks
//! into the alert gate.

mod rule;
mod verdict;

pub use rule::SensorRule;
pub use verdict::{Verdict, CATEGORY_FIRE, CATEGORY_NEUTRAL, CATEGORY_SMOKE};

use capture::VideoFrame;
use thiserror::Error;

/// Errors during classification
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Classification failed: {0}")]
    ClassificationFailed(String),
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
}

/// Frame classifier seam
///
/// Synchronous and deterministic for a given frame and model. May be
/// computationally expensive; callers keep it off the broadcast path.
pub trait Classifier: Send + Sync {
    /// Classify one frame into a normalized verdict
    fn classify(&self, frame: &VideoFrame) -> Result<Verdict, DetectionError>;
}

/// Classifier that always returns the same verdict
///
/// Stands in for the real model in tests and in deployments that have not
/// provisioned one yet.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    category: String,
    confidence: f64,
}

impl FixedClassifier {
    /// Create a classifier pinned to one verdict
    pub fn new(category: impl Into<String>, confidence: f64) -> Self {
        Self {
            category: category.into(),
            confidence,
        }
    }

    /// A classifier that reports no hazard
    pub fn neutral() -> Self {
        Self::new(CATEGORY_NEUTRAL, 99.0)
    }
}

impl Classifier for FixedClassifier {
    fn classify(&self, frame: &VideoFrame) -> Result<Verdict, DetectionError> {
        if !frame.is_well_formed() {
            return Err(DetectionError::InvalidFrame(format!(
                "buffer length {} does not match {}x{}",
                frame.data.len(),
                frame.width,
                frame.height
            )));
        }
        Ok(Verdict::now(self.category.clone(), self.confidence))
    }
}
