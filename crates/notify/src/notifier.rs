//! Fan-out dispatcher

use crate::{test_message, NotifyError, Transport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Outcome of one fan-out over a recipient list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Recipients a delivery was attempted for (after trim/skip)
    pub attempted: usize,
    /// Recipients that received the message
    pub succeeded: usize,
    /// Recipients whose delivery failed after retries
    pub failed_recipients: Vec<String>,
}

impl NotificationResult {
    /// Delivered means at least one recipient got the message
    pub fn delivered(&self) -> bool {
        self.succeeded > 0
    }
}

/// Bounded retry with doubling backoff
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries per recipient after the first attempt
    pub max_retries: u32,
    /// Backoff before the first retry; doubles each retry
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// No retries (single attempt per recipient)
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_backoff: Duration::ZERO,
        }
    }
}

/// Fan-out dispatcher for one channel
pub struct Notifier {
    channel: String,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
}

impl Notifier {
    /// Create a dispatcher over a transport
    pub fn new(channel: impl Into<String>, transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self {
            channel: channel.into(),
            transport,
            retry,
        }
    }

    /// Channel this notifier dispatches for
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Dispatch one message to every recipient
    ///
    /// Recipients are trimmed and empty entries skipped. Each recipient is
    /// independent: a terminal failure lands in `failed_recipients` and the
    /// loop moves on. Zero usable recipients yields the degenerate
    /// `{0, 0, []}` result without error.
    pub async fn dispatch(&self, recipients: &[String], message: &str) -> NotificationResult {
        let mut result = NotificationResult::default();

        for raw in recipients {
            let recipient = raw.trim();
            if recipient.is_empty() {
                continue;
            }
            result.attempted += 1;

            match self.send_with_retry(recipient, message).await {
                Ok(()) => {
                    info!(
                        "[{}] delivered to {} via {}",
                        self.channel,
                        recipient,
                        self.transport.kind()
                    );
                    result.succeeded += 1;
                }
                Err(e) => {
                    error!("[{}] delivery to {} failed: {}", self.channel, recipient, e);
                    result.failed_recipients.push(recipient.to_string());
                }
            }
        }

        if !result.failed_recipients.is_empty() {
            warn!(
                "[{}] failed recipients: {}",
                self.channel,
                result.failed_recipients.join(", ")
            );
        }
        result
    }

    async fn send_with_retry(&self, recipient: &str, message: &str) -> Result<(), NotifyError> {
        let mut backoff = self.retry.base_backoff;
        let mut attempt = 0u32;
        loop {
            match self.transport.send(recipient, message).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.retry.max_retries => {
                    attempt += 1;
                    warn!(
                        "[{}] retry {}/{} for {} after: {}",
                        self.channel, attempt, self.retry.max_retries, recipient, e
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Send a test message, to an explicit recipient or the configured list
    ///
    /// Returns success plus a human-readable summary, mirroring what the
    /// operator sees in the dashboard.
    pub async fn send_test(
        &self,
        configured: &[String],
        explicit: Option<&str>,
    ) -> (bool, String) {
        let targets: Vec<String> = match explicit {
            Some(r) => vec![r.to_string()],
            None => configured.to_vec(),
        };

        let msg = test_message(self.transport.kind());
        let result = self.dispatch(&targets, &msg.body).await;

        if result.delivered() {
            (
                true,
                format!(
                    "Test message sent successfully to {} recipient(s)",
                    result.succeeded
                ),
            )
        } else if result.attempted == 0 {
            (false, "No recipients configured".to_string())
        } else {
            (
                false,
                format!(
                    "Failed to send test message to: {}",
                    result.failed_recipients.join(", ")
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transport;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Transport that fails for recipients on a denylist
    struct DenylistTransport {
        deny: Vec<String>,
        calls: AtomicU32,
    }

    impl DenylistTransport {
        fn new(deny: &[&str]) -> Self {
            Self {
                deny: deny.iter().map(|s| s.to_string()).collect(),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for DenylistTransport {
        fn kind(&self) -> &'static str {
            "test"
        }

        async fn send(&self, recipient: &str, _message: &str) -> Result<(), NotifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.deny.iter().any(|d| d == recipient) {
                Err(NotifyError::Delivery {
                    recipient: recipient.to_string(),
                    reason: "carrier rejected".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn recipients(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_partial_failure_is_isolated() {
        let transport = Arc::new(DenylistTransport::new(&["+15550001"]));
        let notifier = Notifier::new("sms", transport, RetryPolicy::none());

        let result = notifier
            .dispatch(&recipients(&["+15550001", "+15550002"]), "alert")
            .await;

        assert_eq!(result.attempted, 2);
        assert_eq!(result.succeeded, 1);
        assert_eq!(result.failed_recipients, vec!["+15550001".to_string()]);
        assert!(result.delivered());
    }

    #[tokio::test]
    async fn test_zero_recipients_degenerate_result() {
        let transport = Arc::new(DenylistTransport::new(&[]));
        let notifier = Notifier::new("email", transport, RetryPolicy::none());

        let result = notifier.dispatch(&[], "alert").await;
        assert_eq!(result.attempted, 0);
        assert_eq!(result.succeeded, 0);
        assert!(result.failed_recipients.is_empty());
        assert!(!result.delivered());
    }

    #[tokio::test]
    async fn test_blank_recipients_skipped() {
        let transport = Arc::new(DenylistTransport::new(&[]));
        let notifier = Notifier::new("email", Arc::clone(&transport) as Arc<dyn Transport>, RetryPolicy::none());

        let result = notifier
            .dispatch(&recipients(&[" a@example.com ", "", "  "]), "alert")
            .await;
        assert_eq!(result.attempted, 1);
        assert_eq!(result.succeeded, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_recipient_retried_with_backoff() {
        let transport = Arc::new(DenylistTransport::new(&["x@example.com"]));
        let notifier = Notifier::new(
            "email",
            Arc::clone(&transport) as Arc<dyn Transport>,
            RetryPolicy::default(),
        );

        let result = notifier
            .dispatch(&recipients(&["x@example.com"]), "alert")
            .await;

        // 1 initial attempt + 2 retries
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.succeeded, 0);
        assert_eq!(result.failed_recipients.len(), 1);
    }

    #[tokio::test]
    async fn test_explicit_test_recipient_overrides_configured() {
        let transport = Arc::new(DenylistTransport::new(&["bad@example.com"]));
        let notifier = Notifier::new(
            "email",
            Arc::clone(&transport) as Arc<dyn Transport>,
            RetryPolicy::none(),
        );

        let configured = recipients(&["bad@example.com"]);
        let (ok, message) = notifier
            .send_test(&configured, Some("good@example.com"))
            .await;
        assert!(ok);
        assert!(message.contains("1 recipient"));
    }

    #[tokio::test]
    async fn test_test_message_without_recipients_reports_failure() {
        let transport = Arc::new(DenylistTransport::new(&[]));
        let notifier = Notifier::new("sms", transport, RetryPolicy::none());

        let (ok, message) = notifier.send_test(&[], None).await;
        assert!(!ok);
        assert_eq!(message, "No recipients configured");
    }
}
