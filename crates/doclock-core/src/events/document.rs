//! Document-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to document operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DocumentEvent {
    /// A document was uploaded.
    Created {
        /// The document ID.
        document_id: Uuid,
        /// The folder containing the document (None for root).
        folder_id: Option<Uuid>,
        /// The document name.
        name: String,
        /// The document kind ("document" or "image").
        doc_type: String,
        /// Size in bytes.
        size_bytes: i64,
    },
    /// A document was renamed.
    Renamed {
        /// The document ID.
        document_id: Uuid,
        /// The new name.
        new_name: String,
    },
    /// A document was deleted and its binary removed.
    Deleted {
        /// The document ID.
        document_id: Uuid,
        /// The folder it was in.
        folder_id: Option<Uuid>,
        /// The document name (for display after deletion).
        name: String,
    },
}
