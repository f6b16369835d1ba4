//! Subscription handles and per-topic listener counting.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use doclock_core::events::DomainEvent;

use crate::pubsub::FeedInner;

/// Tracks how many live subscriptions each topic has.
#[derive(Debug)]
pub struct SubscriptionTracker {
    counts: DashMap<String, usize>,
}

impl SubscriptionTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
        }
    }

    /// Records a subscription. Returns the new count for the topic.
    pub fn add(&self, topic: &str) -> usize {
        let mut entry = self.counts.entry(topic.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Removes a subscription. Returns the remaining count for the topic
    /// and drops the entry when it reaches zero.
    pub fn remove(&self, topic: &str) -> usize {
        let remaining = match self.counts.get_mut(topic) {
            Some(mut entry) => {
                *entry = entry.saturating_sub(1);
                *entry
            }
            None => return 0,
        };
        if remaining == 0 {
            self.counts.remove_if(topic, |_, count| *count == 0);
        }
        remaining
    }

    /// Current subscription count for a topic.
    pub fn count(&self, topic: &str) -> usize {
        self.counts.get(topic).map(|entry| *entry).unwrap_or(0)
    }
}

impl Default for SubscriptionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Live subscription to one topic.
///
/// Receives every event published after the subscription was opened.
/// Dropping the handle unregisters it; the last handle on a topic also
/// removes the topic channel from the feed.
#[derive(Debug)]
pub struct Subscription {
    topic: String,
    receiver: broadcast::Receiver<DomainEvent>,
    feed: Arc<FeedInner>,
}

impl Subscription {
    pub(crate) fn new(
        topic: String,
        receiver: broadcast::Receiver<DomainEvent>,
        feed: Arc<FeedInner>,
    ) -> Self {
        Self {
            topic,
            receiver,
            feed,
        }
    }

    /// The topic this subscription listens on.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Waits for the next event. Returns `None` once the feed side of the
    /// channel is gone. A slow listener that overflowed its buffer skips
    /// the missed events and resumes with the newest available one.
    pub async fn recv(&mut self) -> Option<DomainEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(topic = %self.topic, skipped, "subscription lagged, skipping missed events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv). Returns `None` when
    /// no event is queued.
    pub fn try_recv(&mut self) -> Option<DomainEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(topic = %self.topic, skipped, "subscription lagged, skipping missed events");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let remaining = self.feed.tracker.remove(&self.topic);
        if remaining == 0 {
            self.feed.channels.remove(&self.topic);
            tracing::debug!(topic = %self.topic, "last subscription closed, topic pruned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_counts_up_and_down() {
        let tracker = SubscriptionTracker::new();
        assert_eq!(tracker.add("t"), 1);
        assert_eq!(tracker.add("t"), 2);
        assert_eq!(tracker.remove("t"), 1);
        assert_eq!(tracker.remove("t"), 0);
        assert_eq!(tracker.count("t"), 0);
    }

    #[test]
    fn remove_on_unknown_topic_is_harmless() {
        let tracker = SubscriptionTracker::new();
        assert_eq!(tracker.remove("missing"), 0);
    }
}
