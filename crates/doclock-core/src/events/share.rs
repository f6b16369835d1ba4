//! Share-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to cross-user share grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShareEvent {
    /// Read access to an item was granted to another user.
    Granted {
        /// The shared document or card ID.
        item_id: Uuid,
        /// The item kind ("document" or "card").
        item_kind: String,
        /// The user receiving access.
        grantee_id: Uuid,
    },
    /// A previously granted share was revoked.
    Revoked {
        /// The shared document or card ID.
        item_id: Uuid,
        /// The item kind ("document" or "card").
        item_kind: String,
        /// The user losing access.
        grantee_id: Uuid,
    },
}
