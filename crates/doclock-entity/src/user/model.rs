//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An account, identified by mobile number and authenticated by MPIN.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Mobile number, digits only, unique across accounts.
    pub mobile: String,
    /// Argon2id hash of the numeric MPIN.
    pub mpin_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Mobile number, digits only.
    pub mobile: String,
    /// Argon2id hash of the MPIN.
    pub mpin_hash: String,
}

/// Basic profile returned alongside a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// The user's ID.
    pub uid: Uuid,
    /// Display name.
    pub name: String,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            uid: user.id,
            name: user.name.clone(),
        }
    }
}
