//! Normalized classification verdict

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category reported for a detected fire
pub const CATEGORY_FIRE: &str = "Fire";
/// Category reported when nothing hazardous is visible
pub const CATEGORY_NEUTRAL: &str = "Neutral";
/// Category reported for visible smoke without flame
pub const CATEGORY_SMOKE: &str = "Smoke";

/// One normalized classification result
///
/// Produced once per reading, immutable, consumed by the broadcast hub and
/// the alert gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Hazard category (e.g. "Fire", "Neutral", "Smoke")
    pub category: String,
    /// Confidence as a percentage, 0–100
    pub confidence: f64,
    /// When the underlying reading was observed
    pub observed_at: DateTime<Utc>,
}

impl Verdict {
    /// Create a verdict stamped with the current time
    pub fn now(category: impl Into<String>, confidence: f64) -> Self {
        Self {
            category: category.into(),
            confidence: confidence.clamp(0.0, 100.0),
            observed_at: Utc::now(),
        }
    }

    /// Whether this verdict names the given category
    pub fn is_category(&self, category: &str) -> bool {
        self.category == category
    }
}
