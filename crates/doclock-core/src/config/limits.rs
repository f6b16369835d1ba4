//! Hierarchy and quota limits.

use serde::{Deserialize, Serialize};

/// Limits on folder nesting and per-user storage.
///
/// These are read once at startup and treated as process-wide, read-mostly
/// configuration. `max_folder_depth` is the single authoritative value;
/// every depth check in the system goes through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum folder nesting depth. A folder at depth `max_folder_depth - 1`
    /// cannot have children.
    #[serde(default = "default_max_folder_depth")]
    pub max_folder_depth: i64,
    /// Per-user storage quota in megabytes.
    #[serde(default = "default_max_storage_mb")]
    pub max_storage_mb: i64,
}

impl LimitsConfig {
    /// The per-user storage quota in bytes.
    pub fn max_storage_bytes(&self) -> i64 {
        self.max_storage_mb * 1024 * 1024
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_folder_depth: default_max_folder_depth(),
            max_storage_mb: default_max_storage_mb(),
        }
    }
}

fn default_max_folder_depth() -> i64 {
    3
}

fn default_max_storage_mb() -> i64 {
    1024
}
