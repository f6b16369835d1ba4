//! In-memory change feed for single-node deployments.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;

use doclock_core::events::DomainEvent;

use crate::subscription::{Subscription, SubscriptionTracker};

/// Default per-topic buffer. A listener that falls this far behind starts
/// skipping events rather than stalling publishers.
pub const DEFAULT_BUFFER_SIZE: usize = 256;

#[derive(Debug)]
pub(crate) struct FeedInner {
    /// Topic name → broadcast sender
    pub(crate) channels: DashMap<String, broadcast::Sender<DomainEvent>>,
    pub(crate) tracker: SubscriptionTracker,
    buffer_size: usize,
}

/// In-memory pub/sub over domain events.
///
/// Cloning is cheap; all clones share the same topic table.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    inner: Arc<FeedInner>,
}

impl ChangeFeed {
    /// Creates a feed with the default per-topic buffer.
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    /// Creates a feed with an explicit per-topic buffer.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            inner: Arc::new(FeedInner {
                channels: DashMap::new(),
                tracker: SubscriptionTracker::new(),
                buffer_size,
            }),
        }
    }

    /// Publishes an event to a topic. Returns the number of live
    /// receivers; zero when nobody is listening, which is not an error.
    pub fn publish(&self, topic: &str, event: DomainEvent) -> usize {
        let Some(tx) = self.inner.channels.get(topic) else {
            return 0;
        };
        match tx.send(event) {
            Ok(delivered) => delivered,
            // All receivers dropped between lookup and send.
            Err(_) => 0,
        }
    }

    /// Subscribes to a topic. The returned handle receives every event
    /// published from this call onward and unregisters itself on drop.
    pub fn subscribe(&self, topic: &str) -> Subscription {
        let receiver = {
            let tx = self
                .inner
                .channels
                .entry(topic.to_string())
                .or_insert_with(|| broadcast::channel(self.inner.buffer_size).0);
            tx.subscribe()
        };
        self.inner.tracker.add(topic);
        tracing::debug!(topic, "subscription opened");
        Subscription::new(topic.to_string(), receiver, Arc::clone(&self.inner))
    }

    /// Number of live subscriptions on a topic.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner.tracker.count(topic)
    }

    /// Number of topics with at least one live subscription.
    pub fn topic_count(&self) -> usize {
        self.inner.channels.len()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use doclock_core::events::folder::FolderEvent;
    use doclock_core::events::{DomainEvent, EventPayload};

    use super::*;

    fn sample_event(actor_id: Uuid) -> DomainEvent {
        DomainEvent::new(
            actor_id,
            EventPayload::Folder(FolderEvent::Renamed {
                folder_id: Uuid::new_v4(),
                new_name: "Taxes".to_string(),
            }),
        )
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let feed = ChangeFeed::new();
        let actor = Uuid::new_v4();
        let mut sub = feed.subscribe("folders:test");

        let delivered = feed.publish("folders:test", sample_event(actor));
        assert_eq!(delivered, 1);

        let event = sub.recv().await.unwrap();
        assert_eq!(event.actor_id, actor);
        assert!(event.timestamp <= Utc::now());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let feed = ChangeFeed::new();
        assert_eq!(feed.publish("folders:empty", sample_event(Uuid::new_v4())), 0);
        assert_eq!(feed.topic_count(), 0);
    }

    #[tokio::test]
    async fn events_scoped_by_topic() {
        let feed = ChangeFeed::new();
        let mut a = feed.subscribe("folders:a");
        let mut b = feed.subscribe("folders:b");

        feed.publish("folders:a", sample_event(Uuid::new_v4()));

        assert!(a.try_recv().is_some());
        assert!(b.try_recv().is_none());
    }

    #[tokio::test]
    async fn drop_prunes_empty_topic() {
        let feed = ChangeFeed::new();
        let first = feed.subscribe("folders:x");
        let second = feed.subscribe("folders:x");
        assert_eq!(feed.subscriber_count("folders:x"), 2);

        drop(first);
        assert_eq!(feed.subscriber_count("folders:x"), 1);
        assert_eq!(feed.topic_count(), 1);

        drop(second);
        assert_eq!(feed.subscriber_count("folders:x"), 0);
        assert_eq!(feed.topic_count(), 0);
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let feed = ChangeFeed::new();
        let mut sub = feed.subscribe("documents:seq");

        let actors: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        for actor in &actors {
            feed.publish("documents:seq", sample_event(*actor));
        }

        for actor in &actors {
            let event = sub.recv().await.unwrap();
            assert_eq!(event.actor_id, *actor);
        }
    }
}
