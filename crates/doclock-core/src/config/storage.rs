//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// File storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored binaries.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum size of a single upload in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload_size(),
        }
    }
}

fn default_root_path() -> String {
    "data/blobs".to_string()
}

fn default_max_upload_size() -> u64 {
    25 * 1024 * 1024
}
