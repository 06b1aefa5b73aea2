//! Access token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use notice_core::config::AuthConfig;
use notice_core::error::AppError;

use super::claims::AccessClaims;
use crate::context::RequestContext;

/// Validates access tokens issued by the host application.
#[derive(Clone)]
pub struct AccessTokenDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for AccessTokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AccessTokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.jwt_leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decode a bearer token into a request context.
    pub fn decode(&self, token: &str) -> Result<RequestContext, AppError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication(format!("Token validation failed: {e}")),
            },
        )?;
        Ok(RequestContext::new(data.claims.sub, data.claims.su))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use notice_core::types::id::UserId;

    fn token(secret: &str, claims: &AccessClaims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "access-secret".into(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_decode_valid_token() {
        let user_id = UserId::new();
        let claims = AccessClaims {
            sub: user_id,
            su: true,
            exp: chrono::Utc::now().timestamp() + 60,
        };
        let ctx = AccessTokenDecoder::new(&config())
            .decode(&token("access-secret", &claims))
            .unwrap();
        assert_eq!(ctx.user_id, user_id);
        assert!(ctx.is_superuser);
    }

    #[test]
    fn test_expired_and_foreign_tokens_rejected() {
        let decoder = AccessTokenDecoder::new(&config());
        let expired = AccessClaims {
            sub: UserId::new(),
            su: false,
            exp: chrono::Utc::now().timestamp() - 3600,
        };
        let err = decoder.decode(&token("access-secret", &expired)).unwrap_err();
        assert_eq!(err.kind, notice_core::error::ErrorKind::Authentication);

        let foreign = AccessClaims {
            exp: chrono::Utc::now().timestamp() + 60,
            ..expired
        };
        assert!(decoder.decode(&token("other-secret", &foreign)).is_err());
    }
}
