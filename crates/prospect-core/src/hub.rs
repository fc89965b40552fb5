//! Broadcast hub fanning feed events out to live subscribers.

use crate::events::FeedEvent;
use tokio::sync::broadcast;

/// Bounded per-subscriber queue depth. A subscriber that falls further
/// behind than this starts losing events rather than stalling ingestion.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Fan-out point for [`FeedEvent`]s.
///
/// Delivery is best-effort: publishing never blocks, a subscriber that
/// lags past its queue capacity drops events, and a disconnected
/// subscriber is simply forgotten. Nothing is buffered for replay.
#[derive(Clone)]
pub struct BroadcastHub {
    tx: broadcast::Sender<FeedEvent>,
}

impl BroadcastHub {
    /// Create a hub with no subscribers.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Open a new subscription. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to every current subscriber. A send with no
    /// subscribers is not an error.
    pub fn publish(&self, event: FeedEvent) {
        let _ = self.tx.send(event);
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}
