//! Secure QR repository: bundle rows plus the ordered membership table.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use doclock_core::error::{AppError, ErrorKind};
use doclock_core::result::AppResult;
use doclock_entity::document::Document;
use doclock_entity::secure_qr::{CreateSecureQr, SecureQr};

/// Repository for secure QR bundles and their document memberships.
#[derive(Debug, Clone)]
pub struct SecureQrRepository {
    pool: SqlitePool,
}

impl SecureQrRepository {
    /// Create a new secure QR repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a bundle together with its ordered membership, atomically.
    pub async fn create(&self, data: &CreateSecureQr, member_ids: &[Uuid]) -> AppResult<SecureQr> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let qr = sqlx::query_as::<_, SecureQr>(
            "INSERT INTO secure_qrs (id, owner_id, label, token, is_active, created_at, expires_at) \
             VALUES (?, ?, ?, ?, 1, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.owner_id)
        .bind(&data.label)
        .bind(&data.token)
        .bind(Utc::now())
        .bind(data.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create secure QR", e))?;

        for (position, document_id) in member_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO secure_qr_documents (qr_id, document_id, position) VALUES (?, ?, ?)",
            )
            .bind(qr.id)
            .bind(*document_id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert QR member", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(qr)
    }

    /// Find a bundle by ID, constrained to its owner.
    pub async fn find_owned(&self, qr_id: Uuid, owner_id: Uuid) -> AppResult<Option<SecureQr>> {
        sqlx::query_as::<_, SecureQr>("SELECT * FROM secure_qrs WHERE id = ? AND owner_id = ?")
            .bind(qr_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find secure QR", e))
    }

    /// Find a bundle by its scan token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<SecureQr>> {
        sqlx::query_as::<_, SecureQr>("SELECT * FROM secure_qrs WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resolve token", e))
    }

    /// List an owner's bundles, newest first.
    pub async fn list_owned(&self, owner_id: Uuid) -> AppResult<Vec<SecureQr>> {
        sqlx::query_as::<_, SecureQr>(
            "SELECT * FROM secure_qrs WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list secure QRs", e))
    }

    /// Member document IDs in stored order.
    pub async fn member_ids(&self, qr_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT document_id FROM secure_qr_documents WHERE qr_id = ? ORDER BY position ASC",
        )
        .bind(qr_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list QR members", e))
    }

    /// Member documents in stored order.
    pub async fn member_documents(&self, qr_id: Uuid) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT d.* FROM secure_qr_documents m \
             INNER JOIN documents d ON d.id = m.document_id \
             WHERE m.qr_id = ? ORDER BY m.position ASC",
        )
        .bind(qr_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load QR documents", e))
    }

    /// Update a bundle's label.
    pub async fn update_label(&self, qr_id: Uuid, label: &str) -> AppResult<()> {
        sqlx::query("UPDATE secure_qrs SET label = ? WHERE id = ?")
            .bind(label)
            .bind(qr_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update label", e))?;
        Ok(())
    }

    /// Reconcile membership after a diff-based update: remove the dropped
    /// IDs, then upsert every surviving ID at its new position.
    pub async fn sync_members(
        &self,
        qr_id: Uuid,
        removed: &[Uuid],
        ordered: &[Uuid],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        for document_id in removed {
            sqlx::query("DELETE FROM secure_qr_documents WHERE qr_id = ? AND document_id = ?")
                .bind(qr_id)
                .bind(*document_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to remove QR member", e)
                })?;
        }

        for (position, document_id) in ordered.iter().enumerate() {
            sqlx::query(
                "INSERT INTO secure_qr_documents (qr_id, document_id, position) VALUES (?, ?, ?) \
                 ON CONFLICT (qr_id, document_id) DO UPDATE SET position = excluded.position",
            )
            .bind(qr_id)
            .bind(*document_id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to upsert QR member", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(())
    }

    /// Delete a bundle (membership rows cascade).
    pub async fn delete(&self, qr_id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM secure_qrs WHERE id = ? AND owner_id = ?")
            .bind(qr_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete secure QR", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a deleted document from every bundle it belongs to.
    /// Returns the IDs of the affected bundles.
    pub async fn remove_document_from_all(&self, document_id: Uuid) -> AppResult<Vec<Uuid>> {
        let qr_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT qr_id FROM secure_qr_documents WHERE document_id = ?",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find QR memberships", e)
        })?;

        sqlx::query("DELETE FROM secure_qr_documents WHERE document_id = ?")
            .bind(document_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to prune QR memberships", e)
            })?;

        Ok(qr_ids)
    }

    /// Deactivate any of the given bundles whose membership is now empty.
    pub async fn deactivate_empty(&self, qr_ids: &[Uuid]) -> AppResult<u64> {
        if qr_ids.is_empty() {
            return Ok(0);
        }
        let mut builder = QueryBuilder::<Sqlite>::new(
            "UPDATE secure_qrs SET is_active = 0 \
             WHERE NOT EXISTS (SELECT 1 FROM secure_qr_documents m WHERE m.qr_id = secure_qrs.id) \
             AND id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in qr_ids {
            separated.push_bind(*id);
        }
        builder.push(")");

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate empty QRs", e)
        })?;
        Ok(result.rows_affected())
    }
}
