//! Share grant repository implementation.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use doclock_core::error::{AppError, ErrorKind};
use doclock_core::result::AppResult;
use doclock_entity::share::{CreateShareGrant, ShareGrant};

/// Repository for cross-user share grants.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: SqlitePool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new grant. A duplicate `(item, grantee)` pair is a conflict.
    pub async fn create(&self, data: &CreateShareGrant) -> AppResult<ShareGrant> {
        sqlx::query_as::<_, ShareGrant>(
            "INSERT INTO share_grants (id, item_id, item_kind, owner_id, grantee_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.item_id)
        .bind(data.item_kind)
        .bind(data.owner_id)
        .bind(data.grantee_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::conflict("This item is already shared with that user")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create share grant", e),
        })
    }

    /// Whether a grant exists for the given item and grantee.
    pub async fn exists(&self, item_id: Uuid, grantee_id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM share_grants WHERE item_id = ? AND grantee_id = ?",
        )
        .bind(item_id)
        .bind(grantee_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check grant", e))?;
        Ok(count > 0)
    }

    /// Revoke a grant. Returns false if no matching grant existed.
    pub async fn delete(
        &self,
        item_id: Uuid,
        grantee_id: Uuid,
        owner_id: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM share_grants WHERE item_id = ? AND grantee_id = ? AND owner_id = ?",
        )
        .bind(item_id)
        .bind(grantee_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke grant", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove all grants for a set of items (used when items are deleted).
    pub async fn delete_for_items(&self, item_ids: &[Uuid]) -> AppResult<u64> {
        if item_ids.is_empty() {
            return Ok(0);
        }
        let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM share_grants WHERE item_id IN (");
        let mut separated = builder.separated(", ");
        for id in item_ids {
            separated.push_bind(*id);
        }
        builder.push(")");

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete grants", e)
        })?;
        Ok(result.rows_affected())
    }

    /// List grants made by an owner for one item.
    pub async fn find_for_item(&self, item_id: Uuid, owner_id: Uuid) -> AppResult<Vec<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>(
            "SELECT * FROM share_grants WHERE item_id = ? AND owner_id = ? ORDER BY created_at ASC",
        )
        .bind(item_id)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list grants", e))
    }

    /// Count documents shared *to* a user. Feeds the "Shared" pseudo-folder.
    pub async fn count_documents_shared_with(&self, grantee_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM share_grants WHERE grantee_id = ? AND item_kind = 'document'",
        )
        .bind(grantee_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count inbound shares", e))
    }
}
