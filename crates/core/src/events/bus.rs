use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::DocsEvent;

/// In-process event bus backed by `tokio::broadcast`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<DocsEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns how many subscribers received it; having none is not an error.
    pub fn publish(&self, event: DocsEvent) -> usize {
        match self.sender.send(event) {
            Ok(count) => count,
            Err(_) => {
                tracing::trace!("event published with no subscribers");
                0
            }
        }
    }

    /// Subscribe to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<DocsEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        assert_eq!(bus.publish(DocsEvent::search_index_updated(3)), 1);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, DocsEvent::SearchIndexUpdated { count: 3, .. }));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(DocsEvent::search_index_reset(0));

        assert!(matches!(rx1.recv().await.unwrap(), DocsEvent::SearchIndexReset { .. }));
        assert!(matches!(rx2.recv().await.unwrap(), DocsEvent::SearchIndexReset { .. }));
    }

    #[test]
    fn publish_without_subscribers() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(DocsEvent::search_index_reset(0)), 0);
    }
}
