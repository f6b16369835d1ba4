//! Tagged union of shareable item kinds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::Card;
use crate::document::Document;
use crate::share::ItemKind;

/// An item that can be shared with another user: a document or a card.
///
/// Call sites match exhaustively; there is no dynamically-typed share
/// payload anywhere in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item", rename_all = "lowercase")]
pub enum ShareableItem {
    /// A document in the folder hierarchy.
    Document(Document),
    /// A payment card.
    Card(Card),
}

impl ShareableItem {
    /// The item's ID.
    pub fn id(&self) -> Uuid {
        match self {
            Self::Document(d) => d.id,
            Self::Card(c) => c.id,
        }
    }

    /// The item's owner.
    pub fn owner_id(&self) -> Uuid {
        match self {
            Self::Document(d) => d.owner_id,
            Self::Card(c) => c.owner_id,
        }
    }

    /// The grant kind for this item.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Document(_) => ItemKind::Document,
            Self::Card(_) => ItemKind::Card,
        }
    }

    /// A human-readable name for notification text.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Document(d) => &d.name,
            Self::Card(c) => &c.label,
        }
    }
}
