//! Document lifecycle: quota-checked upload, rename, delete, live listings,
//! search, and the recipient's shared view.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use doclock_core::config::LimitsConfig;
use doclock_core::error::AppError;
use doclock_core::events::{DocumentEvent, DomainEvent, EventPayload};
use doclock_core::result::AppResult;
use doclock_core::traits::storage::BlobStore;
use doclock_core::types::pagination::{PageRequest, PageResponse};
use doclock_database::repositories::document::DocumentRepository;
use doclock_database::repositories::folder::FolderRepository;
use doclock_database::repositories::secure_qr::SecureQrRepository;
use doclock_database::repositories::share::ShareRepository;
use doclock_database::repositories::usage::StorageUsageRepository;
use doclock_entity::document::{CreateDocument, Document, DocumentType, SharedDocument};
use doclock_realtime::{ChangeFeed, Subscription, topic};
use doclock_storage::sniff;

use crate::context::RequestContext;

/// Manages document records and their binary payloads.
#[derive(Clone)]
pub struct DocumentService {
    document_repo: Arc<DocumentRepository>,
    folder_repo: Arc<FolderRepository>,
    share_repo: Arc<ShareRepository>,
    qr_repo: Arc<SecureQrRepository>,
    usage_repo: Arc<StorageUsageRepository>,
    blob_store: Arc<dyn BlobStore>,
    feed: ChangeFeed,
    limits: LimitsConfig,
}

/// Request to upload a new document or image.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Destination folder (None for root).
    pub folder_id: Option<Uuid>,
    /// Display name for the new document.
    pub file_name: String,
    /// The binary payload.
    pub data: Bytes,
}

impl DocumentService {
    /// Creates a new document service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        document_repo: Arc<DocumentRepository>,
        folder_repo: Arc<FolderRepository>,
        share_repo: Arc<ShareRepository>,
        qr_repo: Arc<SecureQrRepository>,
        usage_repo: Arc<StorageUsageRepository>,
        blob_store: Arc<dyn BlobStore>,
        feed: ChangeFeed,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            document_repo,
            folder_repo,
            share_repo,
            qr_repo,
            usage_repo,
            blob_store,
            feed,
            limits,
        }
    }

    /// Uploads a PDF document. Rejects payloads that are not PDF.
    pub async fn upload_document(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
    ) -> AppResult<Document> {
        if !sniff::is_pdf(&req.data) {
            return Err(AppError::validation("Document uploads must be PDF files"));
        }
        self.upload(ctx, req, DocumentType::Document, "pdf").await
    }

    /// Uploads a raster image (PNG, JPEG, GIF, or WebP).
    pub async fn upload_image(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
    ) -> AppResult<Document> {
        let Some(kind) = sniff::detect_image(&req.data) else {
            return Err(AppError::validation(
                "Image uploads must be PNG, JPEG, GIF, or WebP",
            ));
        };
        self.upload(ctx, req, DocumentType::Image, kind.extension())
            .await
    }

    /// Shared upload flow: reserve quota, write the blob, insert the record.
    ///
    /// The quota reservation happens first and atomically; if any later step
    /// fails the reservation is released and the blob removed, so a failed
    /// upload leaves nothing behind.
    async fn upload(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
        doc_type: DocumentType,
        extension: &str,
    ) -> AppResult<Document> {
        if req.file_name.trim().is_empty() {
            return Err(AppError::validation("Document name cannot be empty"));
        }
        if req.data.is_empty() {
            return Err(AppError::validation("Upload payload is empty"));
        }

        if let Some(folder_id) = req.folder_id {
            self.folder_repo
                .find_owned(folder_id, ctx.user_id)
                .await?
                .ok_or_else(|| AppError::not_found("Folder not found"))?;
        }

        let size = req.data.len() as i64;
        self.usage_repo.ensure_row(ctx.user_id).await?;
        let reserved = self
            .usage_repo
            .try_reserve(ctx.user_id, size, self.limits.max_storage_bytes())
            .await?;
        if !reserved {
            return Err(AppError::quota_exceeded(format!(
                "Upload would exceed the {} MB storage quota",
                self.limits.max_storage_mb
            )));
        }

        let key = format!("{}/{}.{extension}", ctx.user_id, Uuid::new_v4());
        if let Err(e) = self.blob_store.write(&key, req.data).await {
            self.usage_repo.release(ctx.user_id, size).await?;
            return Err(e);
        }

        let record = CreateDocument {
            owner_id: ctx.user_id,
            folder_id: req.folder_id,
            name: req.file_name,
            doc_type,
            url: key.clone(),
            size,
        };
        let document = match self.document_repo.create(&record).await {
            Ok(document) => document,
            Err(e) => {
                // Orphaned binary cleanup; the reservation is returned too.
                if let Err(cleanup) = self.blob_store.delete(&key).await {
                    warn!(key, error = %cleanup, "Failed to remove orphaned blob");
                }
                self.usage_repo.release(ctx.user_id, size).await?;
                return Err(e);
            }
        };

        if let Some(folder_id) = document.folder_id {
            self.folder_repo.adjust_item_count(folder_id, 1).await?;
        }

        info!(
            user_id = %ctx.user_id,
            document_id = %document.id,
            doc_type = %document.doc_type,
            size_bytes = document.size,
            "Document uploaded"
        );

        self.feed.publish(
            &topic::documents(ctx.user_id, document.folder_id),
            DomainEvent::new(
                ctx.user_id,
                EventPayload::Document(DocumentEvent::Created {
                    document_id: document.id,
                    folder_id: document.folder_id,
                    name: document.name.clone(),
                    doc_type: document.doc_type.as_str().to_string(),
                    size_bytes: document.size,
                }),
            ),
        );

        Ok(document)
    }

    /// Renames a document. Renaming to the current name is rejected with no
    /// side effects.
    pub async fn rename_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
        new_name: &str,
    ) -> AppResult<Document> {
        if new_name.trim().is_empty() {
            return Err(AppError::validation("Document name cannot be empty"));
        }

        let document = self
            .document_repo
            .find_owned(document_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;

        if document.name == new_name {
            return Err(AppError::validation("The document already has this name"));
        }

        let renamed = self.document_repo.rename(document_id, new_name).await?;

        info!(user_id = %ctx.user_id, document_id = %document_id, "Document renamed");

        self.feed.publish(
            &topic::documents(ctx.user_id, renamed.folder_id),
            DomainEvent::new(
                ctx.user_id,
                EventPayload::Document(DocumentEvent::Renamed {
                    document_id,
                    new_name: new_name.to_string(),
                }),
            ),
        );

        Ok(renamed)
    }

    /// Deletes a document, its binary, its grants, and its QR memberships.
    /// A QR bundle emptied by the deletion is deactivated.
    pub async fn delete_document(&self, ctx: &RequestContext, document_id: Uuid) -> AppResult<()> {
        let document = self
            .document_repo
            .find_owned(document_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;

        self.blob_store.delete(&document.url).await?;
        self.share_repo.delete_for_items(&[document_id]).await?;

        let touched_qrs = self.qr_repo.remove_document_from_all(document_id).await?;
        self.qr_repo.deactivate_empty(&touched_qrs).await?;

        self.document_repo.delete(document_id).await?;
        self.usage_repo.release(ctx.user_id, document.size).await?;

        if let Some(folder_id) = document.folder_id {
            self.folder_repo.adjust_item_count(folder_id, -1).await?;
        }

        info!(
            user_id = %ctx.user_id,
            document_id = %document_id,
            freed_bytes = document.size,
            "Document deleted"
        );

        self.feed.publish(
            &topic::documents(ctx.user_id, document.folder_id),
            DomainEvent::new(
                ctx.user_id,
                EventPayload::Document(DocumentEvent::Deleted {
                    document_id,
                    folder_id: document.folder_id,
                    name: document.name,
                }),
            ),
        );

        Ok(())
    }

    /// Lists the caller's documents in a folder (or at the root).
    pub async fn list_documents(
        &self,
        ctx: &RequestContext,
        folder_id: Option<Uuid>,
    ) -> AppResult<Vec<Document>> {
        if let Some(folder_id) = folder_id {
            self.folder_repo
                .find_owned(folder_id, ctx.user_id)
                .await?
                .ok_or_else(|| AppError::not_found("Folder not found"))?;
        }
        self.document_repo
            .find_in_folder(ctx.user_id, folder_id)
            .await
    }

    /// Document listing snapshot plus a live subscription to that scope.
    pub async fn watch_documents(
        &self,
        ctx: &RequestContext,
        folder_id: Option<Uuid>,
    ) -> AppResult<(Vec<Document>, Subscription)> {
        let subscription = self
            .feed
            .subscribe(&topic::documents(ctx.user_id, folder_id));
        let documents = self.list_documents(ctx, folder_id).await?;
        Ok((documents, subscription))
    }

    /// Lists documents other users have shared with the caller, the
    /// contents of the "Shared" pseudo-folder.
    pub async fn list_shared_with_me(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<Vec<SharedDocument>> {
        self.document_repo.shared_with(ctx.user_id).await
    }

    /// Case-insensitive substring search over the caller's own documents.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        query: &str,
        page: PageRequest,
    ) -> AppResult<PageResponse<Document>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::validation("Search query cannot be empty"));
        }
        self.document_repo.search(ctx.user_id, query, &page).await
    }

    /// Downloads a document's binary. Allowed for the owner or a user the
    /// document has been shared with.
    pub async fn download(&self, ctx: &RequestContext, document_id: Uuid) -> AppResult<Bytes> {
        let document = self
            .document_repo
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;

        if document.owner_id != ctx.user_id
            && !self.share_repo.exists(document_id, ctx.user_id).await?
        {
            return Err(AppError::authorization(
                "You do not have access to this document",
            ));
        }

        self.blob_store.read_bytes(&document.url).await
    }
}
