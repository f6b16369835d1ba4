//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// A PDF document.
    Document,
    /// A raster image (PNG, JPEG, GIF, WebP).
    Image,
}

impl DocumentType {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Image => "image",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A document stored in a folder (or at the root).
///
/// This row is the owner's canonical record. Shares are grants against it,
/// never copies; recipients see a [`SharedDocument`] projection instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// The account that owns this document.
    pub owner_id: Uuid,
    /// Containing folder (None for root).
    pub folder_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Document kind.
    pub doc_type: DocumentType,
    /// Opaque blob-store key for the binary payload.
    pub url: String,
    /// Payload size in bytes.
    pub size: i64,
    /// When the document was uploaded.
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a new document record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    /// The document owner.
    pub owner_id: Uuid,
    /// Containing folder (None for root).
    pub folder_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Document kind.
    pub doc_type: DocumentType,
    /// Blob-store key.
    pub url: String,
    /// Payload size in bytes.
    pub size: i64,
}

/// A recipient's view of a document shared to them by another user.
///
/// Built at query time from the grant and the owner's canonical row;
/// `is_shared` is always true here and never set on the owner's record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SharedDocument {
    /// The document ID (the owner's record).
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Document kind.
    pub doc_type: DocumentType,
    /// Opaque blob-store key.
    pub url: String,
    /// Payload size in bytes.
    pub size: i64,
    /// When the document was uploaded.
    pub created_at: DateTime<Utc>,
    /// Always true on this projection.
    pub is_shared: bool,
    /// The sharing user's ID.
    pub shared_by: Uuid,
    /// The sharing user's display name.
    pub shared_by_name: String,
}
