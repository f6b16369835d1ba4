//! Secure QR bundle lifecycle and token resolution.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bytes::Bytes;
use rand::RngCore;
use tracing::info;
use uuid::Uuid;

use doclock_core::error::AppError;
use doclock_core::result::AppResult;
use doclock_database::repositories::document::DocumentRepository;
use doclock_database::repositories::secure_qr::SecureQrRepository;
use doclock_entity::secure_qr::{CreateSecureQr, SecureQr, SecureQrBundle};

use crate::context::RequestContext;
use crate::secure_qr::render;

/// Random token length in bytes before base64url encoding.
const TOKEN_BYTES: usize = 32;

/// Manages secure QR bundles.
#[derive(Debug, Clone)]
pub struct SecureQrService {
    qr_repo: Arc<SecureQrRepository>,
    document_repo: Arc<DocumentRepository>,
}

impl SecureQrService {
    /// Creates a new secure QR service.
    pub fn new(qr_repo: Arc<SecureQrRepository>, document_repo: Arc<DocumentRepository>) -> Self {
        Self {
            qr_repo,
            document_repo,
        }
    }

    /// Creates a bundle over the given documents, in the given order.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        label: &str,
        document_ids: &[Uuid],
        expires_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> AppResult<SecureQr> {
        let label = validated_label(label)?;
        self.require_owned_members(ctx, document_ids).await?;

        let qr = self
            .qr_repo
            .create(
                &CreateSecureQr {
                    owner_id: ctx.user_id,
                    label,
                    token: generate_token(),
                    expires_at,
                },
                document_ids,
            )
            .await?;

        info!(
            user_id = %ctx.user_id,
            qr_id = %qr.id,
            members = document_ids.len(),
            "Secure QR created"
        );

        Ok(qr)
    }

    /// Updates a bundle's label and membership.
    ///
    /// Membership reconciliation is diff-based against the caller-supplied
    /// previous membership: dropped IDs are removed, surviving and new IDs
    /// are written at their new positions.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        qr_id: Uuid,
        label: &str,
        document_ids: &[Uuid],
        old_document_ids: &[Uuid],
    ) -> AppResult<SecureQr> {
        let label = validated_label(label)?;
        self.require_owned_members(ctx, document_ids).await?;

        self.qr_repo
            .find_owned(qr_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Secure QR not found"))?;

        let removed: Vec<Uuid> = old_document_ids
            .iter()
            .filter(|id| !document_ids.contains(id))
            .copied()
            .collect();

        self.qr_repo
            .sync_members(qr_id, &removed, document_ids)
            .await?;
        self.qr_repo.update_label(qr_id, &label).await?;

        info!(
            user_id = %ctx.user_id,
            qr_id = %qr_id,
            members = document_ids.len(),
            removed = removed.len(),
            "Secure QR updated"
        );

        self.qr_repo
            .find_owned(qr_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Secure QR not found"))
    }

    /// Deletes a bundle.
    pub async fn delete(&self, ctx: &RequestContext, qr_id: Uuid) -> AppResult<()> {
        let removed = self.qr_repo.delete(qr_id, ctx.user_id).await?;
        if !removed {
            return Err(AppError::not_found("Secure QR not found"));
        }
        info!(user_id = %ctx.user_id, qr_id = %qr_id, "Secure QR deleted");
        Ok(())
    }

    /// Lists the caller's bundles, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<SecureQr>> {
        self.qr_repo.list_owned(ctx.user_id).await
    }

    /// Member document IDs of one of the caller's bundles, in order.
    pub async fn member_ids(&self, ctx: &RequestContext, qr_id: Uuid) -> AppResult<Vec<Uuid>> {
        self.qr_repo
            .find_owned(qr_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Secure QR not found"))?;
        self.qr_repo.member_ids(qr_id).await
    }

    /// Resolves a scanned token to the bundle and its documents.
    ///
    /// Unknown, deactivated, and expired tokens are indistinguishable to
    /// the scanner; all resolve to not-found.
    pub async fn resolve(&self, token: &str) -> AppResult<SecureQrBundle> {
        let qr = self
            .qr_repo
            .find_by_token(token)
            .await?
            .filter(SecureQr::is_resolvable)
            .ok_or_else(|| AppError::not_found("This QR code is no longer valid"))?;

        let documents = self.qr_repo.member_documents(qr.id).await?;
        Ok(SecureQrBundle { qr, documents })
    }

    /// Renders a bundle's scannable QR symbol as a PNG.
    pub async fn render_qr_image(&self, ctx: &RequestContext, qr_id: Uuid) -> AppResult<Bytes> {
        let qr = self
            .qr_repo
            .find_owned(qr_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Secure QR not found"))?;
        render::render_png(&qr.token)
    }

    /// Every member must exist and belong to the caller.
    async fn require_owned_members(
        &self,
        ctx: &RequestContext,
        document_ids: &[Uuid],
    ) -> AppResult<()> {
        if document_ids.is_empty() {
            return Err(AppError::validation(
                "A secure QR must contain at least one document",
            ));
        }
        for document_id in document_ids {
            self.document_repo
                .find_owned(*document_id, ctx.user_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Document {document_id} not found"))
                })?;
        }
        Ok(())
    }
}

/// Trimmed, non-empty label.
fn validated_label(label: &str) -> AppResult<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(AppError::validation("Label cannot be empty"));
    }
    Ok(label.to_string())
}

/// Opaque 32-byte random token, base64url without padding.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_url_safe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43); // 32 bytes, base64 without padding
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn label_is_trimmed_and_must_be_non_empty() {
        assert_eq!(validated_label("  Passport  ").unwrap(), "Passport");
        assert!(validated_label("   ").is_err());
    }
}
