//! In-process change feed for DocLock.
//!
//! Services publish [`DomainEvent`]s after their database work commits;
//! listeners hold a [`Subscription`] handle scoped to a topic and receive
//! every event published while the handle is alive. Dropping the handle
//! unregisters the listener and prunes the topic channel when it was the
//! last one.
//!
//! [`DomainEvent`]: doclock_core::events::DomainEvent

pub mod pubsub;
pub mod subscription;
pub mod topic;

pub use pubsub::ChangeFeed;
pub use subscription::{Subscription, SubscriptionTracker};
