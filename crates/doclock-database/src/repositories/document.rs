//! Document repository implementation.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use doclock_core::error::{AppError, ErrorKind};
use doclock_core::result::AppResult;
use doclock_core::types::pagination::{PageRequest, PageResponse};
use doclock_entity::document::{CreateDocument, Document, SharedDocument};

/// Repository for document CRUD, search, and the shared-with-me projection.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a document by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    /// Find a document by ID, constrained to its owner.
    pub async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    /// List documents in a folder (or at the root), newest first.
    pub async fn find_in_folder(
        &self,
        owner_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE owner_id = ? AND folder_id IS ? \
             ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    /// List all documents contained in any of the given folders.
    pub async fn find_in_folders(&self, folder_ids: &[Uuid]) -> AppResult<Vec<Document>> {
        if folder_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder =
            QueryBuilder::<Sqlite>::new("SELECT * FROM documents WHERE folder_id IN (");
        let mut separated = builder.separated(", ");
        for id in folder_ids {
            separated.push_bind(*id);
        }
        builder.push(")");

        builder
            .build_query_as::<Document>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list folder documents", e)
            })
    }

    /// Insert a new document record.
    pub async fn create(&self, data: &CreateDocument) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "INSERT INTO documents (id, owner_id, folder_id, name, doc_type, url, size, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.owner_id)
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(data.doc_type)
        .bind(&data.url)
        .bind(data.size)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create document", e))
    }

    /// Rename a document.
    pub async fn rename(&self, document_id: Uuid, new_name: &str) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "UPDATE documents SET name = ? WHERE id = ? RETURNING *",
        )
        .bind(new_name)
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename document", e))?
        .ok_or_else(|| AppError::not_found(format!("Document {document_id} not found")))
    }

    /// Delete a document record.
    pub async fn delete(&self, document_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(document_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete document", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a set of documents by ID. Returns the number of rows removed.
    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM documents WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        builder.push(")");

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete documents", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Case-insensitive substring search over the owner's document names.
    ///
    /// Scoped strictly to `owner_id`; never matches other users' documents.
    pub async fn search(
        &self,
        owner_id: Uuid,
        query: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Document>> {
        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM documents WHERE owner_id = ? AND LOWER(name) LIKE ? ESCAPE '\\'",
        )
        .bind(owner_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count matches", e))?;

        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE owner_id = ? AND LOWER(name) LIKE ? ESCAPE '\\' \
             ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(owner_id)
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search documents", e))?;

        Ok(PageResponse::new(
            documents,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List documents shared to a user by others, with sharer identity.
    pub async fn shared_with(&self, grantee_id: Uuid) -> AppResult<Vec<SharedDocument>> {
        sqlx::query_as::<_, SharedDocument>(
            "SELECT d.id, d.name, d.doc_type, d.url, d.size, d.created_at, \
                    1 AS is_shared, g.owner_id AS shared_by, u.name AS shared_by_name \
             FROM share_grants g \
             INNER JOIN documents d ON d.id = g.item_id \
             INNER JOIN users u ON u.id = g.owner_id \
             WHERE g.grantee_id = ? AND g.item_kind = 'document' \
             ORDER BY g.created_at DESC",
        )
        .bind(grantee_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list shared documents", e)
        })
    }

    /// Count all documents belonging to an owner.
    pub async fn count_owned(&self, owner_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count documents", e))
    }
}

/// Escape `%`, `_`, and the escape character itself for a LIKE pattern.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }
}
