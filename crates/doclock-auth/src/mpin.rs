//! Argon2id MPIN hashing and format validation.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use doclock_core::error::AppError;

/// Allowed MPIN lengths, inclusive.
pub const MIN_MPIN_LEN: usize = 4;
pub const MAX_MPIN_LEN: usize = 6;

/// Checks that an MPIN is 4 to 6 ASCII digits.
pub fn validate_mpin_format(mpin: &str) -> Result<(), AppError> {
    if mpin.len() < MIN_MPIN_LEN || mpin.len() > MAX_MPIN_LEN {
        return Err(AppError::validation(format!(
            "MPIN must be {MIN_MPIN_LEN} to {MAX_MPIN_LEN} digits"
        )));
    }
    if !mpin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::validation("MPIN must contain only digits"));
    }
    Ok(())
}

/// Handles MPIN hashing and verification using Argon2id.
#[derive(Debug, Clone)]
pub struct MpinHasher;

impl MpinHasher {
    /// Creates a new hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes an MPIN using Argon2id with a random salt.
    pub fn hash_mpin(&self, mpin: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(mpin.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("MPIN hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies an MPIN against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the MPIN matches, `Ok(false)` if not.
    pub fn verify_mpin(&self, mpin: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid MPIN hash format: {e}")))?;

        let argon2 = Argon2::default();
        match argon2.verify_password(mpin.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!("MPIN verification failed: {e}"))),
        }
    }
}

impl Default for MpinHasher {
    fn default() -> Self {
        Self::new()
    }
}
