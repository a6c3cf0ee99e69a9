use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_core::AccountId;

use crate::Role;

/// JWT claims carried by bearer tokens.
///
/// This is the minimal claim set the storefront expects once a token has
/// been decoded and its signature verified. Timestamps are seconds since the
/// Unix epoch, as in standard JWT `iat`/`exp` claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the authenticated account.
    pub sub: AccountId,

    /// Role granted to the subject at issue time.
    pub role: Role,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the time window of a set of claims.
///
/// Note: this validates the *claims* only. Signature verification happens in
/// [`crate::jwt`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now.timestamp() < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now.timestamp() >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_at(iat: i64, exp: i64) -> JwtClaims {
        JwtClaims {
            sub: AccountId::new(),
            role: Role::User,
            iat,
            exp,
        }
    }

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).unwrap()
    }

    #[test]
    fn accepts_claims_inside_window() {
        assert!(validate_claims(&claims_at(100, 200), at(150)).is_ok());
    }

    #[test]
    fn rejects_expired_claims() {
        assert_eq!(
            validate_claims(&claims_at(100, 200), at(200)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn rejects_claims_issued_in_the_future() {
        assert_eq!(
            validate_claims(&claims_at(100, 200), at(50)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn rejects_inverted_window() {
        assert_eq!(
            validate_claims(&claims_at(200, 100), at(150)),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
