//! Share grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of shareable item a grant refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A document in the folder hierarchy.
    Document,
    /// A payment card.
    Card,
}

impl ItemKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Card => "card",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cross-user read-access grant on a document or card.
///
/// Grants are references to the owner's canonical record, never copies.
/// At most one grant exists per `(item_id, grantee_id)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareGrant {
    /// Unique grant identifier.
    pub id: Uuid,
    /// The shared document or card.
    pub item_id: Uuid,
    /// Whether the item is a document or a card.
    pub item_kind: ItemKind,
    /// The sharing user (owner of the item).
    pub owner_id: Uuid,
    /// The user receiving read access.
    pub grantee_id: Uuid,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new share grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareGrant {
    /// The shared document or card.
    pub item_id: Uuid,
    /// Whether the item is a document or a card.
    pub item_kind: ItemKind,
    /// The sharing user.
    pub owner_id: Uuid,
    /// The user receiving read access.
    pub grantee_id: Uuid,
}
