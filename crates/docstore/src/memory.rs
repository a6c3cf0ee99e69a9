use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::collection::{Collection, StoreError};

/// In-memory collection for dev/tests.
///
/// Documents are held in their serialized JSON form so lookups behave
/// identically to the persistent backend.
#[derive(Debug)]
pub struct InMemoryCollection<T> {
    inner: RwLock<HashMap<String, serde_json::Value>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> InMemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for InMemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("collection lock poisoned".to_string())
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Codec(e.to_string()))
}

#[async_trait]
impl<T> Collection<T> for InMemoryCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        map.get(id).cloned().map(decode).transpose()
    }

    async fn put(&self, id: &str, doc: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(doc).map_err(|e| StoreError::Codec(e.to_string()))?;
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(id.to_string(), value);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        map.values().cloned().map(decode).collect()
    }

    async fn find_by(&self, field: &str, value: &str) -> Result<Option<T>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        map.values()
            .find(|doc| doc.get(field).and_then(|f| f.as_str()) == Some(value))
            .cloned()
            .map(decode)
            .transpose()
    }
}
