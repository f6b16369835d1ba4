//! Folder CRUD with depth enforcement, live listings, and cascading delete.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use doclock_core::config::LimitsConfig;
use doclock_core::error::AppError;
use doclock_core::events::{DomainEvent, EventPayload, FolderEvent};
use doclock_core::result::AppResult;
use doclock_core::traits::storage::BlobStore;
use doclock_database::repositories::document::DocumentRepository;
use doclock_database::repositories::folder::FolderRepository;
use doclock_database::repositories::secure_qr::SecureQrRepository;
use doclock_database::repositories::share::ShareRepository;
use doclock_database::repositories::usage::StorageUsageRepository;
use doclock_entity::folder::depth::{can_create_child_folder, can_create_root_folder};
use doclock_entity::folder::name::validate_folder_name;
use doclock_entity::folder::{CreateFolder, Folder, RootListing, SharedFolder};
use doclock_realtime::{ChangeFeed, Subscription, topic};

use crate::context::RequestContext;

/// Manages the per-user folder tree.
#[derive(Clone)]
pub struct FolderService {
    folder_repo: Arc<FolderRepository>,
    document_repo: Arc<DocumentRepository>,
    share_repo: Arc<ShareRepository>,
    qr_repo: Arc<SecureQrRepository>,
    usage_repo: Arc<StorageUsageRepository>,
    blob_store: Arc<dyn BlobStore>,
    feed: ChangeFeed,
    limits: LimitsConfig,
}

/// Request to create a new folder.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root-level).
    pub parent_id: Option<Uuid>,
    /// Display hint, stored verbatim.
    pub icon: Option<String>,
}

impl FolderService {
    /// Creates a new folder service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        document_repo: Arc<DocumentRepository>,
        share_repo: Arc<ShareRepository>,
        qr_repo: Arc<SecureQrRepository>,
        usage_repo: Arc<StorageUsageRepository>,
        blob_store: Arc<dyn BlobStore>,
        feed: ChangeFeed,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            folder_repo,
            document_repo,
            share_repo,
            qr_repo,
            usage_repo,
            blob_store,
            feed,
            limits,
        }
    }

    /// Creates a new folder under the given parent (or at the root).
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        validate_folder_name(&req.name)?;

        let depth = match req.parent_id {
            Some(parent_id) => {
                let parent = self
                    .folder_repo
                    .find_owned(parent_id, ctx.user_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Parent folder not found"))?;

                if !can_create_child_folder(parent.depth, self.limits.max_folder_depth) {
                    return Err(AppError::depth_limit(format!(
                        "Folders cannot be nested more than {} levels deep",
                        self.limits.max_folder_depth
                    )));
                }
                parent.depth + 1
            }
            None => {
                if !can_create_root_folder(self.limits.max_folder_depth) {
                    return Err(AppError::depth_limit("Folder creation is disabled"));
                }
                0
            }
        };

        if self
            .folder_repo
            .find_sibling_by_name(ctx.user_id, req.parent_id, &req.name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists here",
                req.name
            )));
        }

        let folder = self
            .folder_repo
            .create(&CreateFolder {
                owner_id: ctx.user_id,
                parent_id: req.parent_id,
                name: req.name,
                depth,
                icon: req.icon,
            })
            .await?;

        if let Some(parent_id) = folder.parent_id {
            self.folder_repo.adjust_item_count(parent_id, 1).await?;
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            depth = folder.depth,
            "Folder created"
        );

        self.feed.publish(
            &topic::folders(ctx.user_id, folder.parent_id),
            DomainEvent::new(
                ctx.user_id,
                EventPayload::Folder(FolderEvent::Created {
                    folder_id: folder.id,
                    parent_id: folder.parent_id,
                    name: folder.name.clone(),
                    depth: folder.depth,
                }),
            ),
        );

        Ok(folder)
    }

    /// Renames a folder. Renaming to the current name is rejected with no
    /// side effects.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_name: &str,
    ) -> AppResult<Folder> {
        validate_folder_name(new_name)?;

        let folder = self
            .folder_repo
            .find_owned(folder_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        if folder.name == new_name {
            return Err(AppError::validation(
                "The folder already has this name",
            ));
        }

        if self
            .folder_repo
            .find_sibling_by_name(ctx.user_id, folder.parent_id, new_name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A folder named '{new_name}' already exists here"
            )));
        }

        let renamed = self.folder_repo.rename(folder_id, new_name).await?;

        info!(user_id = %ctx.user_id, folder_id = %folder_id, "Folder renamed");

        self.feed.publish(
            &topic::folders(ctx.user_id, renamed.parent_id),
            DomainEvent::new(
                ctx.user_id,
                EventPayload::Folder(FolderEvent::Renamed {
                    folder_id,
                    new_name: new_name.to_string(),
                }),
            ),
        );

        Ok(renamed)
    }

    /// Deletes a folder, its entire subtree, and every contained document
    /// together with its binary. Destructive; there is no trash.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<()> {
        let folder = self
            .folder_repo
            .find_owned(folder_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        let subtree = self.folder_repo.find_subtree(folder_id).await?;
        let folder_ids: Vec<Uuid> = subtree.iter().map(|f| f.id).collect();
        let documents = self.document_repo.find_in_folders(&folder_ids).await?;

        let mut freed_bytes: i64 = 0;
        let mut document_ids = Vec::with_capacity(documents.len());
        for document in &documents {
            self.blob_store.delete(&document.url).await?;
            freed_bytes += document.size;
            document_ids.push(document.id);
        }

        self.share_repo.delete_for_items(&document_ids).await?;

        let mut touched_qrs = Vec::new();
        for document_id in &document_ids {
            touched_qrs.extend(self.qr_repo.remove_document_from_all(*document_id).await?);
        }
        self.qr_repo.deactivate_empty(&touched_qrs).await?;

        self.document_repo.delete_by_ids(&document_ids).await?;
        self.folder_repo.delete_by_ids(&folder_ids).await?;

        if freed_bytes > 0 {
            self.usage_repo.release(ctx.user_id, freed_bytes).await?;
        }
        if let Some(parent_id) = folder.parent_id {
            self.folder_repo.adjust_item_count(parent_id, -1).await?;
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            folders_removed = folder_ids.len(),
            documents_removed = document_ids.len(),
            freed_bytes,
            "Folder deleted"
        );

        self.feed.publish(
            &topic::folders(ctx.user_id, folder.parent_id),
            DomainEvent::new(
                ctx.user_id,
                EventPayload::Folder(FolderEvent::Deleted {
                    folder_id,
                    parent_id: folder.parent_id,
                    name: folder.name,
                }),
            ),
        );

        Ok(())
    }

    /// Lists the caller's root folders plus the synthesized "Shared"
    /// pseudo-folder when they have at least one inbound share.
    pub async fn list_roots(&self, ctx: &RequestContext) -> AppResult<RootListing> {
        let folders = self.folder_repo.find_roots(ctx.user_id).await?;
        let shared_count = self
            .share_repo
            .count_documents_shared_with(ctx.user_id)
            .await?;

        let shared = (shared_count > 0).then(|| SharedFolder::new(shared_count));
        Ok(RootListing { folders, shared })
    }

    /// Lists the direct children of a folder.
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
    ) -> AppResult<Vec<Folder>> {
        self.folder_repo
            .find_owned(parent_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        self.folder_repo.find_children(ctx.user_id, parent_id).await
    }

    /// Root listing snapshot plus a live subscription to root-level changes.
    ///
    /// The snapshot is taken after the subscription opens, so an event that
    /// races the snapshot is at worst a duplicate keyed upsert or removal.
    pub async fn watch_roots(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<(RootListing, Subscription)> {
        let subscription = self.feed.subscribe(&topic::folders(ctx.user_id, None));
        let listing = self.list_roots(ctx).await?;
        Ok((listing, subscription))
    }

    /// Child listing snapshot plus a live subscription to that folder's
    /// direct children.
    pub async fn watch_children(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
    ) -> AppResult<(Vec<Folder>, Subscription)> {
        let subscription = self
            .feed
            .subscribe(&topic::folders(ctx.user_id, Some(parent_id)));
        let children = self.list_children(ctx, parent_id).await?;
        Ok((children, subscription))
    }
}
