//! `storefront-auth` — authentication boundary (credentials and identity).
//!
//! This crate is intentionally decoupled from HTTP and storage: it models
//! bearer-token claims, signs/verifies HS256 tokens, and wraps the one-way
//! password hash/compare primitive. Callers decide what to do with a
//! verified identity.

pub mod claims;
pub mod jwt;
pub mod password;
pub mod roles;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256Jwt, JwtValidator, TokenError};
pub use password::{MIN_PASSWORD_LENGTH, PasswordError, hash_password, validate_password, verify_password};
pub use roles::Role;
