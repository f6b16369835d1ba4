//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A notification appended to a user's notification list.
///
/// Delivery is best-effort, at-least-once append; there is no delivery
/// acknowledgment beyond the row existing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// Notification category (see `NotificationCategory`).
    pub category: String,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Whether the user has read this notification.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// The recipient user.
    pub user_id: Uuid,
    /// Notification category.
    pub category: String,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
}
