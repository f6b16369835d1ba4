//! Per-user storage usage counter.
//!
//! Every upload and delete mutates this counter. All mutations are single
//! atomic SQL statements, so concurrent uploads from multiple devices of
//! the same user can never lose an update or overshoot the quota.

use sqlx::SqlitePool;
use uuid::Uuid;

use doclock_core::error::{AppError, ErrorKind};
use doclock_core::result::AppResult;

/// Repository for the per-user aggregate storage usage counter.
#[derive(Debug, Clone)]
pub struct StorageUsageRepository {
    pool: SqlitePool,
}

impl StorageUsageRepository {
    /// Create a new storage usage repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Ensure a counter row exists for the user.
    pub async fn ensure_row(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO storage_usage (user_id, used_bytes) VALUES (?, 0)")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to init usage row", e)
            })?;
        Ok(())
    }

    /// Current usage in bytes.
    pub async fn used_bytes(&self, user_id: Uuid) -> AppResult<i64> {
        let used: Option<i64> =
            sqlx::query_scalar("SELECT used_bytes FROM storage_usage WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to read usage", e)
                })?;
        Ok(used.unwrap_or(0))
    }

    /// Atomically reserve `bytes` against the quota.
    ///
    /// The increment and the quota check are one conditional UPDATE; it
    /// succeeds only if the reservation fits. Returns false when the quota
    /// would be exceeded.
    pub async fn try_reserve(
        &self,
        user_id: Uuid,
        bytes: i64,
        quota_bytes: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE storage_usage SET used_bytes = used_bytes + ?1 \
             WHERE user_id = ?2 AND used_bytes + ?1 <= ?3",
        )
        .bind(bytes)
        .bind(user_id)
        .bind(quota_bytes)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reserve usage", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically release previously reserved bytes (floored at zero).
    pub async fn release(&self, user_id: Uuid, bytes: i64) -> AppResult<()> {
        sqlx::query(
            "UPDATE storage_usage SET used_bytes = MAX(used_bytes - ?, 0) WHERE user_id = ?",
        )
        .bind(bytes)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to release usage", e))?;
        Ok(())
    }
}
