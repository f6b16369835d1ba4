//! Account registration and MPIN login.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use doclock_auth::jwt::{JwtDecoder, JwtEncoder};
use doclock_auth::mpin::{MpinHasher, validate_mpin_format};
use doclock_core::error::AppError;
use doclock_core::result::AppResult;
use doclock_database::repositories::usage::StorageUsageRepository;
use doclock_database::repositories::user::UserRepository;
use doclock_entity::user::{CreateUser, Profile};

use crate::context::RequestContext;

/// Manages accounts and bearer tokens.
#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    usage_repo: Arc<StorageUsageRepository>,
    hasher: MpinHasher,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

/// Request to create a new account.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Mobile number, digits only.
    pub mobile: String,
    /// Chosen MPIN, 4 to 6 digits.
    pub mpin: String,
    /// Identifier of the registering device.
    pub device_id: String,
}

/// Request to log in to an existing account.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    /// Mobile number.
    pub mobile: String,
    /// MPIN.
    pub mpin: String,
    /// Identifier of the logging-in device.
    pub device_id: String,
}

/// A successful authentication result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuthToken {
    /// Signed bearer token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// Basic profile of the authenticated user.
    pub profile: Profile,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        usage_repo: Arc<StorageUsageRepository>,
        hasher: MpinHasher,
        encoder: JwtEncoder,
        decoder: JwtDecoder,
    ) -> Self {
        Self {
            user_repo,
            usage_repo,
            hasher,
            encoder,
            decoder,
        }
    }

    /// Registers a new account and returns a bearer token for it.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<AuthToken> {
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        validate_mobile(&req.mobile)?;
        validate_mpin_format(&req.mpin)?;

        let mpin_hash = self.hasher.hash_mpin(&req.mpin)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                name: req.name,
                mobile: req.mobile,
                mpin_hash,
            })
            .await?;
        self.usage_repo.ensure_row(user.id).await?;

        info!(user_id = %user.id, "Account registered");

        let (token, expires_at) =
            self.encoder
                .generate_token(user.id, &user.name, &req.device_id)?;
        Ok(AuthToken {
            token,
            expires_at,
            profile: Profile::from(&user),
        })
    }

    /// Authenticates mobile + MPIN and returns a bearer token.
    ///
    /// Unknown mobile and wrong MPIN produce the same error so the response
    /// does not reveal which accounts exist.
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthToken> {
        let user = self
            .user_repo
            .find_by_mobile(&req.mobile)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid mobile number or MPIN"))?;

        if !self.hasher.verify_mpin(&req.mpin, &user.mpin_hash)? {
            return Err(AppError::authentication("Invalid mobile number or MPIN"));
        }

        info!(user_id = %user.id, device_id = %req.device_id, "User logged in");

        let (token, expires_at) =
            self.encoder
                .generate_token(user.id, &user.name, &req.device_id)?;
        Ok(AuthToken {
            token,
            expires_at,
            profile: Profile::from(&user),
        })
    }

    /// Verifies a bearer token and builds the request context for it.
    pub fn verify_token(&self, token: &str) -> AppResult<RequestContext> {
        let claims = self.decoder.decode_token(token)?;
        Ok(RequestContext::new(
            claims.sub,
            claims.name,
            claims.device_id,
        ))
    }
}

/// Mobile numbers are 8 to 15 digits.
fn validate_mobile(mobile: &str) -> AppResult<()> {
    if mobile.len() < 8 || mobile.len() > 15 || !mobile.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::validation("Mobile number must be 8 to 15 digits"));
    }
    Ok(())
}
