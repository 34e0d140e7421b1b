//! Transport seam
//!
//! The concrete SMTP/carrier plumbing lives outside this workspace; the
//! fan-out only needs a per-recipient send. Implementations are injected at
//! startup behind the trait.

use crate::NotifyError;
use async_trait::async_trait;
use tracing::info;

/// One notification transport (email, SMS, ...)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport kind for logging ("email", "sms", ...)
    fn kind(&self) -> &'static str;

    /// Deliver one message to one recipient
    async fn send(&self, recipient: &str, message: &str) -> Result<(), NotifyError>;
}

/// Transport that logs deliveries instead of sending them
///
/// Default stand-in for deployments without provisioned credentials, and
/// the delivery target in development.
#[derive(Debug, Clone)]
pub struct ConsoleTransport {
    kind: &'static str,
}

impl ConsoleTransport {
    pub fn new(kind: &'static str) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    fn kind(&self) -> &'static str {
        self.kind
    }

    async fn send(&self, recipient: &str, message: &str) -> Result<(), NotifyError> {
        info!(
            "[{}] would deliver to {}: {}",
            self.kind,
            recipient,
            message.lines().next().unwrap_or_default()
        );
        Ok(())
    }
}
