//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use doclock_core::config::AuthConfig;
use doclock_core::error::AppError;

use super::claims::Claims;

/// Validates JWT access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use doclock_core::config::AuthConfig;
    use doclock_core::error::ErrorKind;

    use super::*;
    use crate::jwt::JwtEncoder;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-not-for-production".to_string(),
            token_ttl_minutes: 60,
        }
    }

    #[test]
    fn encode_then_decode_preserves_claims() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let user_id = Uuid::new_v4();
        let (token, _) = encoder.generate_token(user_id, "Asha", "device-1").unwrap();

        let claims = decoder.decode_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.name, "Asha");
        assert_eq!(claims.device_id, "device-1");
        assert!(!claims.is_expired());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let encoder = JwtEncoder::new(&test_config());
        let decoder = JwtDecoder::new(&AuthConfig {
            jwt_secret: "a-different-secret".to_string(),
            token_ttl_minutes: 60,
        });

        let (token, _) = encoder
            .generate_token(Uuid::new_v4(), "Asha", "device-1")
            .unwrap();

        let err = decoder.decode_token(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn rejects_garbage_token() {
        let decoder = JwtDecoder::new(&test_config());
        assert!(decoder.decode_token("not.a.jwt").is_err());
    }
}
