//! HS256 token signing and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use storefront_core::AccountId;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};
use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature check or decoding failed.
    #[error("invalid token")]
    Invalid,

    /// Claims decoded fine but fail the time-window rules.
    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    #[error("failed to encode token: {0}")]
    Encode(String),
}

/// Verifies a bearer token and yields its claims.
///
/// Trait boundary so the HTTP layer never depends on a concrete signing
/// scheme.
pub trait JwtValidator: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError>;
}

/// HS256 signer/verifier sharing one symmetric secret.
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256Jwt {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for `sub` valid for `ttl` starting at `now`.
    pub fn issue(
        &self,
        sub: AccountId,
        role: Role,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = JwtClaims {
            sub,
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }
}

impl JwtValidator for Hs256Jwt {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        // Expiry is checked deterministically by `validate_claims` against the
        // caller-supplied clock, not by the decoder.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips() {
        let jwt = Hs256Jwt::new(b"test-secret");
        let sub = AccountId::new();
        let now = Utc::now();

        let token = jwt.issue(sub, Role::Admin, now, Duration::minutes(10)).unwrap();
        let claims = jwt.verify(&token, now).unwrap();

        assert_eq!(claims.sub, sub);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn verification_fails_with_wrong_secret() {
        let signer = Hs256Jwt::new(b"secret-a");
        let verifier = Hs256Jwt::new(b"secret-b");
        let now = Utc::now();

        let token = signer
            .issue(AccountId::new(), Role::User, now, Duration::minutes(10))
            .unwrap();

        assert_eq!(verifier.verify(&token, now), Err(TokenError::Invalid));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = Hs256Jwt::new(b"test-secret");
        let now = Utc::now();

        let token = jwt
            .issue(AccountId::new(), Role::User, now - Duration::hours(2), Duration::hours(1))
            .unwrap();

        assert_eq!(
            jwt.verify(&token, now),
            Err(TokenError::Claims(TokenValidationError::Expired))
        );
    }

    #[test]
    fn garbage_token_is_rejected() {
        let jwt = Hs256Jwt::new(b"test-secret");
        assert_eq!(jwt.verify("not-a-jwt", Utc::now()), Err(TokenError::Invalid));
    }
}
