//! Notification Fan-out
//!
//! Dispatches one logical alert to every recipient on a channel, one
//! transport call per recipient. A recipient's failure is isolated: it is
//! retried with bounded backoff, then recorded in the result's failed list
//! without aborting the loop or touching other recipients. The overall
//! dispatch counts as delivered when at least one recipient got the message.

mod message;
mod notifier;
mod transport;

pub use message::{alert_message, test_message, AlertMessage};
pub use notifier::{NotificationResult, Notifier, RetryPolicy};
pub use transport::{ConsoleTransport, Transport};

use thiserror::Error;

/// Transport-level delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Delivery to {recipient} failed: {reason}")]
    Delivery { recipient: String, reason: String },

    #[error("Transport not available: {0}")]
    Unavailable(String),
}
