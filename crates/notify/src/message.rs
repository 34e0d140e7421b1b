//! Alert and test message bodies

use chrono::{DateTime, Utc};

/// Rendered notification content
#[derive(Debug, Clone)]
pub struct AlertMessage {
    /// Short subject line
    pub title: String,
    /// Full body
    pub body: String,
}

/// Render the body for a fired hazard alert
pub fn alert_message(
    category: &str,
    confidence: f64,
    location: &str,
    alert_number: u64,
    raised_at: DateTime<Utc>,
) -> AlertMessage {
    let title = format!("HAZARD ALERT - FireGuard (Alert #{})", alert_number);
    let body = format!(
        "CRITICAL: {} detected with {:.1}% confidence\n\
         \n\
         Location: {}\n\
         Time: {}\n\
         Alert #{}\n\
         \n\
         Immediate action required!\n\
         Check the monitoring system for details.\n\
         \n\
         This is an automated alert from FireGuard.",
        category,
        confidence,
        location,
        raised_at.format("%Y-%m-%d %H:%M:%S"),
        alert_number,
    );
    AlertMessage { title, body }
}

/// Render the body for a test notification
pub fn test_message(kind: &str) -> AlertMessage {
    let title = "FireGuard Test Message".to_string();
    let body = format!(
        "This is a test of the {} alert system.\n\
         Time: {}\n\
         \n\
         If you receive this message, {} alerts are working correctly.\n\
         \n\
         System Status: Operational",
        kind,
        Utc::now().format("%Y-%m-%d %H:%M:%S"),
        kind,
    );
    AlertMessage { title, body }
}
