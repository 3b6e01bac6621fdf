use tokio::sync::broadcast;

use crate::constants::system;
use crate::models::AdaptationEvent;

/// Broadcast publisher for adaptation events
#[derive(Debug, Clone)]
pub struct AdaptationPublisher {
    sender: broadcast::Sender<AdaptationEvent>,
}

impl AdaptationPublisher {
    /// Create a new publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an adaptation event to all current subscribers.
    ///
    /// Returns the number of subscribers that received it; having none is not an error.
    pub fn publish(&self, event: AdaptationEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to adaptation events
    pub fn subscribe(&self) -> broadcast::Receiver<AdaptationEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for AdaptationPublisher {
    fn default() -> Self {
        Self::new(system::ADAPTATION_CHANNEL_CAPACITY)
    }
}
