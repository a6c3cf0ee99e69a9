//! Postgres-backed collection: one row per document, JSONB payload.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::collection::{Collection, StoreError};

pub struct PgCollection<T> {
    pool: PgPool,
    table: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PgCollection<T> {
    pub fn new(pool: PgPool, table: &'static str) -> Self {
        Self {
            pool,
            table,
            _marker: PhantomData,
        }
    }

    /// Create the backing table if it does not exist yet.
    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, doc JSONB NOT NULL)",
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await.map_err(backend)?;
        Ok(())
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn decode_row<T: DeserializeOwned>(row: PgRow) -> Result<T, StoreError> {
    let doc: serde_json::Value = row.try_get("doc").map_err(backend)?;
    serde_json::from_value(doc).map_err(|e| StoreError::Codec(e.to_string()))
}

#[async_trait]
impl<T> Collection<T> for PgCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", self.table);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.map(decode_row).transpose()
    }

    async fn put(&self, id: &str, doc: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(doc).map_err(|e| StoreError::Codec(e.to_string()))?;
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc",
            self.table
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        let sql = format!("SELECT doc FROM {}", self.table);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows.into_iter().map(decode_row).collect()
    }

    async fn find_by(&self, field: &str, value: &str) -> Result<Option<T>, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE doc->>$1 = $2 LIMIT 1", self.table);
        let row = sqlx::query(&sql)
            .bind(field)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.map(decode_row).transpose()
    }
}
