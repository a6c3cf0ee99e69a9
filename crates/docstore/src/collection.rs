use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use storefront_core::DomainError;

/// Store-level failure, distinct from "document absent" (`Ok(None)`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),

    #[error("document codec failure: {0}")]
    Codec(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::Internal(err.to_string())
    }
}

/// A named collection of documents keyed by a string identifier.
///
/// Contract (matches a generic document store):
/// - `put` inserts or fully replaces one document and is atomic per
///   document; concurrent writers are last-write-wins.
/// - absence is reported as `Ok(None)` / `Ok(false)`, never as an error.
/// - `find_by` is an exact match on a top-level **string** field of the
///   serialized document (e.g. `email`).
///
/// No transactions, no optimistic concurrency, no retries: a failed call
/// surfaces immediately to the caller.
#[async_trait]
pub trait Collection<T>: Send + Sync
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, id: &str) -> Result<Option<T>, StoreError>;

    async fn put(&self, id: &str, doc: &T) -> Result<(), StoreError>;

    async fn remove(&self, id: &str) -> Result<bool, StoreError>;

    async fn list(&self) -> Result<Vec<T>, StoreError>;

    async fn find_by(&self, field: &str, value: &str) -> Result<Option<T>, StoreError>;
}
