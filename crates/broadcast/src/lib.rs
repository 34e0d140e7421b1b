//! Broadcast Hub
//!
//! Fire-and-forget event distribution to live subscribers. Every verdict,
//! raw sensor relay, and alert event flows through one `broadcast::Sender`,
//! so all subscribers observe events in publish order per topic. Best-effort
//! only: a subscriber that disconnects or lags simply misses events, with no
//! buffering or replay.

mod event;

pub use event::{AlertNotice, Event, Severity, Topic, VerdictUpdate};

use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Default capacity of the underlying broadcast channel
///
/// At 10 Hz of verdict updates this is ~25s of slack before a slow
/// subscriber starts missing events.
pub const DEFAULT_CAPACITY: usize = 256;

/// The single logical broadcast point
#[derive(Debug, Clone)]
pub struct Hub {
    tx: broadcast::Sender<Event>,
}

impl Hub {
    /// Create a hub with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a hub with an explicit channel capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish one event to all current subscribers
    ///
    /// Never fails: with no subscribers the event is simply dropped.
    pub fn publish(&self, event: Event) {
        match self.tx.send(event) {
            Ok(n) => trace!("Published to {} subscriber(s)", n),
            Err(_) => debug!("Published with no subscribers; event dropped"),
        }
    }

    /// Register a new live subscriber
    ///
    /// The hub keeps no reference: dropping the receiver is the disconnect.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of currently-connected subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}
