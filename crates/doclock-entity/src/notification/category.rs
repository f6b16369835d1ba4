//! Notification category enumeration.

use serde::{Deserialize, Serialize};

/// Category of a notification for filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Share-related notifications.
    Share,
    /// Folder-related notifications.
    Folder,
    /// Document-related notifications.
    Document,
    /// Security-sensitive notifications (e.g. an item shared with you).
    Security,
    /// System-level notifications.
    System,
}

impl NotificationCategory {
    /// Return the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Share => "share",
            Self::Folder => "folder",
            Self::Document => "document",
            Self::Security => "security",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
