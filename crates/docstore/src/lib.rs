//! `storefront-docstore` — the document-store boundary.
//!
//! The rest of the system treats persistence as a set of named collections
//! of JSON documents with per-document atomic replace. This crate defines
//! that contract ([`Collection`]) plus an in-memory backend (default, used
//! for dev and tests) and a Postgres JSONB backend behind the `postgres`
//! feature.

pub mod collection;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use collection::{Collection, StoreError};
pub use memory::InMemoryCollection;
#[cfg(feature = "postgres")]
pub use postgres::PgCollection;
