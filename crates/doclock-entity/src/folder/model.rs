//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Display name of the synthesized pseudo-folder aggregating inbound shares.
pub const SHARED_FOLDER_NAME: &str = "Shared";

/// A folder in the per-user hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// The account that owns this folder. Folders are never shared.
    pub owner_id: Uuid,
    /// Parent folder ID (None for root folders).
    pub parent_id: Option<Uuid>,
    /// User-editable label.
    pub name: String,
    /// Depth in the folder tree (0 for root, parent depth + 1 otherwise).
    pub depth: i64,
    /// Count of direct child folders plus direct documents, maintained
    /// incrementally.
    pub item_count: i64,
    /// Display hint only; never interpreted by the service.
    pub icon: Option<String>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The folder owner.
    pub owner_id: Uuid,
    /// Parent folder (None for root).
    pub parent_id: Option<Uuid>,
    /// Folder name.
    pub name: String,
    /// Depth in the tree.
    pub depth: i64,
    /// Display hint.
    pub icon: Option<String>,
}

/// The synthesized, non-persisted "Shared" folder shown at root level when
/// the user has at least one document shared to them. It has no row behind
/// it and therefore cannot be renamed or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedFolder {
    /// Always [`SHARED_FOLDER_NAME`].
    pub name: String,
    /// Number of documents shared to the user.
    pub item_count: i64,
}

impl SharedFolder {
    /// Create the pseudo-folder for a given inbound share count.
    pub fn new(item_count: i64) -> Self {
        Self {
            name: SHARED_FOLDER_NAME.to_string(),
            item_count,
        }
    }
}

/// Root-level folder listing: persisted folders plus the optional
/// pseudo-folder overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootListing {
    /// The user's root folders, sorted by name.
    pub folders: Vec<Folder>,
    /// Present only when the user has inbound shares.
    pub shared: Option<SharedFolder>,
}
