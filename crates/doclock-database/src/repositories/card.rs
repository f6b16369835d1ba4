//! Card repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use doclock_core::error::{AppError, ErrorKind};
use doclock_core::result::AppResult;
use doclock_entity::card::{Card, CreateCard};

/// Repository for stored payment cards.
#[derive(Debug, Clone)]
pub struct CardRepository {
    pool: SqlitePool,
}

impl CardRepository {
    /// Create a new card repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new card.
    pub async fn create(&self, data: &CreateCard) -> AppResult<Card> {
        sqlx::query_as::<_, Card>(
            "INSERT INTO cards (id, owner_id, label, holder_name, number, expiry_month, expiry_year, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.owner_id)
        .bind(&data.label)
        .bind(&data.holder_name)
        .bind(&data.number)
        .bind(data.expiry_month)
        .bind(data.expiry_year)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create card", e))
    }

    /// Find a card by ID, constrained to its owner.
    pub async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Card>> {
        sqlx::query_as::<_, Card>("SELECT * FROM cards WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find card", e))
    }

    /// List an owner's cards, newest first.
    pub async fn list_owned(&self, owner_id: Uuid) -> AppResult<Vec<Card>> {
        sqlx::query_as::<_, Card>(
            "SELECT * FROM cards WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list cards", e))
    }

    /// Delete a card.
    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cards WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete card", e))?;
        Ok(result.rows_affected() > 0)
    }
}
