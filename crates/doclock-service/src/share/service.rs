//! Share grants: item-kind-agnostic granting, revocation, and the
//! best-effort notification bridge to the grantee.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use doclock_core::error::AppError;
use doclock_core::events::{DomainEvent, EventPayload, ShareEvent};
use doclock_core::result::AppResult;
use doclock_database::repositories::card::CardRepository;
use doclock_database::repositories::document::DocumentRepository;
use doclock_database::repositories::share::ShareRepository;
use doclock_database::repositories::user::UserRepository;
use doclock_entity::notification::NotificationCategory;
use doclock_entity::share::{CreateShareGrant, ShareGrant};
use doclock_entity::shareable::ShareableItem;
use doclock_realtime::{ChangeFeed, topic};

use crate::context::RequestContext;
use crate::notification::NotificationService;

/// Manages cross-user read-access grants.
#[derive(Clone)]
pub struct ShareService {
    share_repo: Arc<ShareRepository>,
    document_repo: Arc<DocumentRepository>,
    card_repo: Arc<CardRepository>,
    user_repo: Arc<UserRepository>,
    notifications: NotificationService,
    feed: ChangeFeed,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        share_repo: Arc<ShareRepository>,
        document_repo: Arc<DocumentRepository>,
        card_repo: Arc<CardRepository>,
        user_repo: Arc<UserRepository>,
        notifications: NotificationService,
        feed: ChangeFeed,
    ) -> Self {
        Self {
            share_repo,
            document_repo,
            card_repo,
            user_repo,
            notifications,
            feed,
        }
    }

    /// Shares one of the caller's documents with another user.
    pub async fn share_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
        grantee_id: Uuid,
    ) -> AppResult<ShareGrant> {
        let document = self
            .document_repo
            .find_owned(document_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;
        self.share_item(ctx, ShareableItem::Document(document), grantee_id)
            .await
    }

    /// Shares one of the caller's cards with another user.
    pub async fn share_card(
        &self,
        ctx: &RequestContext,
        card_id: Uuid,
        grantee_id: Uuid,
    ) -> AppResult<ShareGrant> {
        let card = self
            .card_repo
            .find_owned(card_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Card not found"))?;
        self.share_item(ctx, ShareableItem::Card(card), grantee_id)
            .await
    }

    /// Grants a user read access to an item.
    ///
    /// The grant insert is the operation; the notification to the grantee
    /// is best-effort and a failure there never fails the share.
    pub async fn share_item(
        &self,
        ctx: &RequestContext,
        item: ShareableItem,
        grantee_id: Uuid,
    ) -> AppResult<ShareGrant> {
        if item.owner_id() != ctx.user_id {
            return Err(AppError::authorization(
                "Only the owner can share this item",
            ));
        }
        if grantee_id == ctx.user_id {
            return Err(AppError::validation("Cannot share an item with yourself"));
        }

        self.user_repo
            .find_by_id(grantee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipient not found"))?;

        // Duplicate grants surface as Conflict from the unique index.
        let grant = self
            .share_repo
            .create(&CreateShareGrant {
                item_id: item.id(),
                item_kind: item.kind(),
                owner_id: ctx.user_id,
                grantee_id,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            item_id = %grant.item_id,
            item_kind = %grant.item_kind,
            grantee_id = %grantee_id,
            "Item shared"
        );

        if let Err(e) = self
            .notifications
            .notify(
                grantee_id,
                NotificationCategory::Security,
                "New item shared with you",
                format!("{} shared \"{}\" with you", ctx.name, item.display_name()),
            )
            .await
        {
            warn!(grantee_id = %grantee_id, error = %e, "Share notification failed");
        }

        self.feed.publish(
            &topic::shared_with(grantee_id),
            DomainEvent::new(
                ctx.user_id,
                EventPayload::Share(ShareEvent::Granted {
                    item_id: grant.item_id,
                    item_kind: grant.item_kind.as_str().to_string(),
                    grantee_id,
                }),
            ),
        );

        Ok(grant)
    }

    /// Revokes a grant the caller previously issued.
    pub async fn revoke_share(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
        grantee_id: Uuid,
    ) -> AppResult<()> {
        let grants = self.share_repo.find_for_item(item_id, ctx.user_id).await?;
        let grant = grants
            .into_iter()
            .find(|g| g.grantee_id == grantee_id)
            .ok_or_else(|| AppError::not_found("Share grant not found"))?;

        let removed = self
            .share_repo
            .delete(item_id, grantee_id, ctx.user_id)
            .await?;
        if !removed {
            return Err(AppError::not_found("Share grant not found"));
        }

        info!(
            user_id = %ctx.user_id,
            item_id = %item_id,
            grantee_id = %grantee_id,
            "Share revoked"
        );

        self.feed.publish(
            &topic::shared_with(grantee_id),
            DomainEvent::new(
                ctx.user_id,
                EventPayload::Share(ShareEvent::Revoked {
                    item_id,
                    item_kind: grant.item_kind.as_str().to_string(),
                    grantee_id,
                }),
            ),
        );

        Ok(())
    }

    /// Lists the grants the caller has issued for one of their items.
    pub async fn list_grants_for_item(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
    ) -> AppResult<Vec<ShareGrant>> {
        self.share_repo.find_for_item(item_id, ctx.user_id).await
    }

    /// Number of documents shared to a user; feeds the "Shared"
    /// pseudo-folder badge.
    pub async fn count_shared_with(&self, user_id: Uuid) -> AppResult<i64> {
        self.share_repo.count_documents_shared_with(user_id).await
    }
}
