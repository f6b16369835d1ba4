//! Secure QR entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::document::Document;

/// A named bundle of document references exposed through a scannable QR
/// code, optionally time-limited.
///
/// The ordered membership lives in a separate table; a QR whose membership
/// has been emptied by document deletions is deactivated rather than left
/// dangling.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SecureQr {
    /// Unique bundle identifier.
    pub id: Uuid,
    /// The account that created the bundle.
    pub owner_id: Uuid,
    /// User-chosen label.
    pub label: String,
    /// Opaque random token embedded in the QR payload.
    pub token: String,
    /// Whether the bundle can currently be resolved.
    pub is_active: bool,
    /// When the bundle was created.
    pub created_at: DateTime<Utc>,
    /// Optional expiry; an expired bundle resolves to not-found.
    pub expires_at: Option<DateTime<Utc>>,
}

impl SecureQr {
    /// Whether the bundle has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| exp <= Utc::now()).unwrap_or(false)
    }

    /// Whether a scan of this bundle's token should resolve.
    pub fn is_resolvable(&self) -> bool {
        self.is_active && !self.is_expired()
    }
}

/// Data required to create a new secure QR bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSecureQr {
    /// The bundle owner.
    pub owner_id: Uuid,
    /// User-chosen label.
    pub label: String,
    /// Opaque random token.
    pub token: String,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A resolved bundle: the QR record plus its member documents in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecureQrBundle {
    /// The bundle record.
    pub qr: SecureQr,
    /// Member documents in stored order.
    pub documents: Vec<Document>,
}
