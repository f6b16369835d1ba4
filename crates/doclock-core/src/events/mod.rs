//! Domain events emitted by DocLock operations.
//!
//! Events are published through the in-process change feed and consumed by
//! live folder/document subscriptions. Services publish an event only after
//! the corresponding database write has committed, so within one topic the
//! delivery order is consistent with write order.

pub mod document;
pub mod folder;
pub mod share;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use document::DocumentEvent;
pub use folder::FolderEvent;
pub use share::ShareEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event.
    pub actor_id: Uuid,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A folder-related event.
    Folder(FolderEvent),
    /// A document-related event.
    Document(DocumentEvent),
    /// A share-related event.
    Share(ShareEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Uuid, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }
}
