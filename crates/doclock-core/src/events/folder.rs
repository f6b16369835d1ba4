//! Folder-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to folder operations.
///
/// Carried as incremental diffs on a `(owner, parent)` topic: creates and
/// renames are keyed upserts, deletes are keyed removals, so a consumer can
/// safely apply an event that raced its initial snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FolderEvent {
    /// A folder was created.
    Created {
        /// The folder ID.
        folder_id: Uuid,
        /// The parent folder (None for root-level).
        parent_id: Option<Uuid>,
        /// The folder name.
        name: String,
        /// Depth in the tree (0 for root).
        depth: i64,
    },
    /// A folder was renamed.
    Renamed {
        /// The folder ID.
        folder_id: Uuid,
        /// The new name.
        new_name: String,
    },
    /// A folder was deleted, together with its entire subtree.
    Deleted {
        /// The folder ID.
        folder_id: Uuid,
        /// The parent it was removed from.
        parent_id: Option<Uuid>,
        /// The folder name (for display after deletion).
        name: String,
    },
}
