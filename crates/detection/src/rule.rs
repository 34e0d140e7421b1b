//! Sensor threshold rules
//!
//! A pushed sensor reading carries raw fields, not a classification. A rule
//! compares one numeric field against a fixed threshold and, when exceeded,
//! emits a synthetic full-confidence verdict the rest of the pipeline treats
//! exactly like a classifier verdict.

use crate::{Verdict, CATEGORY_FIRE};
use capture::SensorReading;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Threshold mapping from a sensor field to a verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorRule {
    /// Field to inspect (default "temperature")
    pub field: String,
    /// Inclusive threshold above which the rule trips
    pub threshold: f64,
    /// Category of the synthetic verdict
    pub category: String,
}

impl Default for SensorRule {
    fn default() -> Self {
        Self {
            field: "temperature".to_string(),
            threshold: 55.0,
            category: CATEGORY_FIRE.to_string(),
        }
    }
}

impl SensorRule {
    /// Apply the rule to a reading
    ///
    /// Returns a synthetic verdict when the field is present, numeric, and at
    /// or above the threshold; None otherwise (including missing field).
    pub fn apply(&self, reading: &SensorReading) -> Option<Verdict> {
        let value = reading.numeric(&self.field)?;
        if value >= self.threshold {
            debug!(
                "Sensor rule tripped: {} = {} >= {}",
                self.field, value, self.threshold
            );
            Some(Verdict::now(self.category.clone(), 100.0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(json: &str) -> SensorReading {
        SensorReading::parse(json).unwrap()
    }

    #[test]
    fn test_rule_trips_at_threshold_inclusive() {
        let rule = SensorRule::default();
        let verdict = rule.apply(&reading(r#"{"temperature": 55.0}"#)).unwrap();
        assert_eq!(verdict.category, CATEGORY_FIRE);
        assert!((verdict.confidence - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rule_quiet_below_threshold() {
        let rule = SensorRule::default();
        assert!(rule.apply(&reading(r#"{"temperature": 54.9}"#)).is_none());
    }

    #[test]
    fn test_rule_ignores_missing_or_non_numeric_field() {
        let rule = SensorRule::default();
        assert!(rule.apply(&reading(r#"{"humidity": 90}"#)).is_none());
        assert!(rule.apply(&reading(r#"{"temperature": "hot"}"#)).is_none());
    }

    #[test]
    fn test_rule_custom_field_and_category() {
        let rule = SensorRule {
            field: "smoke_ppm".to_string(),
            threshold: 300.0,
            category: "Smoke".to_string(),
        };
        let verdict = rule.apply(&reading(r#"{"smoke_ppm": 412}"#)).unwrap();
        assert_eq!(verdict.category, "Smoke");
    }
}
