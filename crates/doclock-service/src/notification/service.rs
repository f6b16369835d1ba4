//! Per-user notification list.
//!
//! Appends are at-least-once; the row existing is the only delivery
//! guarantee. Callers that treat notification as best-effort (sharing)
//! log and swallow failures themselves.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use doclock_core::error::AppError;
use doclock_core::result::AppResult;
use doclock_core::types::pagination::{PageRequest, PageResponse};
use doclock_database::repositories::notification::NotificationRepository;
use doclock_entity::notification::{CreateNotification, Notification, NotificationCategory};

use crate::context::RequestContext;

/// Manages per-user notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notification_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notification_repo: Arc<NotificationRepository>) -> Self {
        Self { notification_repo }
    }

    /// Appends a notification to a user's list.
    pub async fn notify(
        &self,
        user_id: Uuid,
        category: NotificationCategory,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> AppResult<Notification> {
        let notification = self
            .notification_repo
            .create(&CreateNotification {
                user_id,
                category: category.as_str().to_string(),
                title: title.into(),
                message: message.into(),
            })
            .await?;

        info!(
            user_id = %user_id,
            notification_id = %notification.id,
            category = %category,
            "Notification appended"
        );

        Ok(notification)
    }

    /// Lists the caller's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.notification_repo.find_by_user(ctx.user_id, &page).await
    }

    /// Number of unread notifications for the caller.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.notification_repo.count_unread(ctx.user_id).await
    }

    /// Marks one of the caller's notifications as read.
    pub async fn mark_read(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        let updated = self
            .notification_repo
            .mark_read(notification_id, ctx.user_id)
            .await?;
        if !updated {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Marks all of the caller's notifications as read. Returns the number
    /// of notifications that changed state.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notification_repo.mark_all_read(ctx.user_id).await
    }
}
