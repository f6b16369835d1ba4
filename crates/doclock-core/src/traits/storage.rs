//! Blob storage abstraction.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Binary object storage reachable by an opaque key.
///
/// Keys are slash-separated relative paths (e.g. `{owner}/{uuid}.pdf`).
/// Implementations must treat `delete` of a missing key as a no-op so that
/// cleanup paths are idempotent.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a binary payload under the given key, replacing any existing one.
    async fn write(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Read the full payload stored under the given key.
    async fn read_bytes(&self, key: &str) -> AppResult<Bytes>;

    /// Remove the payload stored under the given key, if present.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a payload exists under the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
