//! Payment card entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored payment card. Cards live outside the folder hierarchy and are
/// shareable as a unit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Card {
    /// Unique card identifier.
    pub id: Uuid,
    /// The account that owns this card.
    pub owner_id: Uuid,
    /// User-chosen label (e.g. "Personal Visa").
    pub label: String,
    /// Cardholder name as printed.
    pub holder_name: String,
    /// Card number, digits only.
    pub number: String,
    /// Expiry month (1-12).
    pub expiry_month: i64,
    /// Expiry year (four digits).
    pub expiry_year: i64,
    /// When the card was added.
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// The last four digits, for display.
    pub fn last4(&self) -> &str {
        let len = self.number.len();
        &self.number[len.saturating_sub(4)..]
    }
}

/// Data required to store a new card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCard {
    /// The card owner.
    pub owner_id: Uuid,
    /// User-chosen label.
    pub label: String,
    /// Cardholder name.
    pub holder_name: String,
    /// Card number, digits only.
    pub number: String,
    /// Expiry month (1-12).
    pub expiry_month: i64,
    /// Expiry year (four digits).
    pub expiry_year: i64,
}
