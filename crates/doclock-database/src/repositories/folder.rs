//! Folder repository implementation.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use doclock_core::error::{AppError, ErrorKind};
use doclock_core::result::AppResult;
use doclock_entity::folder::{CreateFolder, Folder};

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID, constrained to its owner.
    pub async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// List root folders for an owner, sorted by name.
    pub async fn find_roots(&self, owner_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner_id = ? AND parent_id IS NULL ORDER BY name ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list root folders", e))
    }

    /// List direct children of a folder, sorted by name.
    pub async fn find_children(&self, owner_id: Uuid, parent_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner_id = ? AND parent_id = ? ORDER BY name ASC",
        )
        .bind(owner_id)
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// Find a sibling folder with the given name, if any.
    pub async fn find_sibling_by_name(
        &self,
        owner_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner_id = ? AND parent_id IS ? AND name = ?",
        )
        .bind(owner_id)
        .bind(parent_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find sibling", e))
    }

    /// Create a new folder with an empty item count.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let now = Utc::now();
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, owner_id, parent_id, name, depth, item_count, icon, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.owner_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(data.depth)
        .bind(&data.icon)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))
    }

    /// Rename a folder.
    pub async fn rename(&self, folder_id: Uuid, new_name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(new_name)
        .bind(Utc::now())
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Atomically adjust a folder's direct item count.
    pub async fn adjust_item_count(&self, folder_id: Uuid, delta: i64) -> AppResult<()> {
        sqlx::query("UPDATE folders SET item_count = item_count + ?, updated_at = ? WHERE id = ?")
            .bind(delta)
            .bind(Utc::now())
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to adjust item count", e)
            })?;
        Ok(())
    }

    /// Recursive query returning a folder and all of its descendants.
    pub async fn find_subtree(&self, folder_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "WITH RECURSIVE tree AS ( \
                SELECT * FROM folders WHERE id = ? \
                UNION ALL \
                SELECT f.* FROM folders f INNER JOIN tree t ON f.parent_id = t.id \
             ) SELECT * FROM tree ORDER BY depth ASC, name ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list subtree", e))
    }

    /// Delete a set of folders by ID. Returns the number of rows removed.
    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM folders WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        builder.push(")");

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete folders", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Count all folders belonging to an owner.
    pub async fn count_owned(&self, owner_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM folders WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count folders", e))
    }
}
