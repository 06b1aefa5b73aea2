//! Signed unsubscribe codes.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use notice_core::config::AuthConfig;
use notice_core::error::{AppError, ErrorKind};
use notice_core::types::id::UserId;

use super::claims::{UNSUBSCRIBE_PURPOSE, UnsubscribeClaims};

/// Signs user ids into unsubscribe codes and verifies them.
#[derive(Clone)]
pub struct UnsubscribeSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for UnsubscribeSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsubscribeSigner").finish_non_exhaustive()
    }
}

impl UnsubscribeSigner {
    /// Create a signer keyed with `auth.signing_secret`.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(config.signing_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.signing_secret.as_bytes()),
            validation,
        }
    }

    /// Sign a user id.
    pub fn sign(&self, user_id: UserId) -> Result<String, AppError> {
        let claims = UnsubscribeClaims {
            sub: user_id,
            purpose: UNSUBSCRIBE_PURPOSE.to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                format!("Failed to sign unsubscribe code: {e}"),
                e,
            )
        })
    }

    /// Verify a code and return the user id it was signed for.
    pub fn unsign(&self, code: &str) -> Result<UserId, AppError> {
        let data = decode::<UnsubscribeClaims>(code, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::authentication(format!("Bad unsubscribe signature: {e}")))?;
        if data.claims.purpose != UNSUBSCRIBE_PURPOSE {
            return Err(AppError::authentication("Code was not issued for unsubscribing"));
        }
        Ok(data.claims.sub)
    }
}
