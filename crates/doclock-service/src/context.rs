//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for the current authenticated request.
///
/// Built from verified JWT claims and passed into every service method so
/// each operation knows who is acting and from which device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// Display name (convenience field from JWT claims).
    pub name: String,
    /// The device the token was issued to.
    pub device_id: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, name: String, device_id: String) -> Self {
        Self {
            user_id,
            name,
            device_id,
            request_time: Utc::now(),
        }
    }
}
