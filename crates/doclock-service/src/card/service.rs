//! Card storage. Cards live outside the folder tree and exist chiefly so
//! the sharing layer has a second item kind.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use doclock_core::error::AppError;
use doclock_core::result::AppResult;
use doclock_database::repositories::card::CardRepository;
use doclock_database::repositories::share::ShareRepository;
use doclock_entity::card::{Card, CreateCard};

use crate::context::RequestContext;

/// Manages stored payment cards.
#[derive(Debug, Clone)]
pub struct CardService {
    card_repo: Arc<CardRepository>,
    share_repo: Arc<ShareRepository>,
}

/// Request to store a new card.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AddCardRequest {
    /// User-chosen label.
    pub label: String,
    /// Cardholder name as printed.
    pub holder_name: String,
    /// Card number, digits only.
    pub number: String,
    /// Expiry month (1-12).
    pub expiry_month: i64,
    /// Expiry year (four digits).
    pub expiry_year: i64,
}

impl CardService {
    /// Creates a new card service.
    pub fn new(card_repo: Arc<CardRepository>, share_repo: Arc<ShareRepository>) -> Self {
        Self {
            card_repo,
            share_repo,
        }
    }

    /// Stores a new card after validating its fields.
    pub async fn add_card(&self, ctx: &RequestContext, req: AddCardRequest) -> AppResult<Card> {
        if req.label.trim().is_empty() {
            return Err(AppError::validation("Card label cannot be empty"));
        }
        if req.holder_name.trim().is_empty() {
            return Err(AppError::validation("Cardholder name cannot be empty"));
        }
        if req.number.len() < 12
            || req.number.len() > 19
            || !req.number.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AppError::validation(
                "Card number must be 12 to 19 digits",
            ));
        }
        if !(1..=12).contains(&req.expiry_month) {
            return Err(AppError::validation("Expiry month must be 1 to 12"));
        }
        if !(1000..=9999).contains(&req.expiry_year) {
            return Err(AppError::validation("Expiry year must be four digits"));
        }

        let card = self
            .card_repo
            .create(&CreateCard {
                owner_id: ctx.user_id,
                label: req.label,
                holder_name: req.holder_name,
                number: req.number,
                expiry_month: req.expiry_month,
                expiry_year: req.expiry_year,
            })
            .await?;

        info!(user_id = %ctx.user_id, card_id = %card.id, "Card added");

        Ok(card)
    }

    /// Lists the caller's cards.
    pub async fn list_cards(&self, ctx: &RequestContext) -> AppResult<Vec<Card>> {
        self.card_repo.list_owned(ctx.user_id).await
    }

    /// Deletes one of the caller's cards together with its share grants.
    pub async fn delete_card(&self, ctx: &RequestContext, card_id: Uuid) -> AppResult<()> {
        let removed = self.card_repo.delete(card_id, ctx.user_id).await?;
        if !removed {
            return Err(AppError::not_found("Card not found"));
        }
        self.share_repo.delete_for_items(&[card_id]).await?;
        info!(user_id = %ctx.user_id, card_id = %card_id, "Card deleted");
        Ok(())
    }
}
