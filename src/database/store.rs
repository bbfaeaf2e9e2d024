//! Hall record store
//!
//! The CRUD handlers only see [`HalaStore`]: a key-indexed record store with
//! get, list, insert, update and delete. [`PgHalaStore`] backs it with
//! PostgreSQL; `MemoryHalaStore` in the sibling module keeps records in process.

use async_trait::async_trait;
use thiserror::Error;

use crate::database::connection::DatabaseConnection;
use crate::database::models::{FromRow, Hala, HalaPayload};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to get database connection: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("database query failed: {0}")]
    Query(#[from] tokio_postgres::Error),
}

#[async_trait]
pub trait HalaStore: Send + Sync {
    async fn get(&self, id: i32) -> Result<Option<Hala>, StoreError>;

    async fn list(&self) -> Result<Vec<Hala>, StoreError>;

    /// Insert a new record and return it with its assigned id.
    async fn insert(&self, payload: HalaPayload) -> Result<Hala, StoreError>;

    /// Replace `nazwa` and `adres` of an existing record. Returns `false` if
    /// no record has this id.
    async fn update(&self, id: i32, payload: HalaPayload) -> Result<bool, StoreError>;

    /// Remove a record, returning what was deleted.
    async fn delete(&self, id: i32) -> Result<Option<Hala>, StoreError>;
}

/// PostgreSQL-backed store over the `hala` table
#[derive(Debug, Clone)]
pub struct PgHalaStore {
    db: DatabaseConnection,
}

impl PgHalaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HalaStore for PgHalaStore {
    async fn get(&self, id: i32) -> Result<Option<Hala>, StoreError> {
        let client = self.db.pool().get().await?;
        let row = client
            .query_opt("SELECT id, nazwa, adres FROM hala WHERE id = $1", &[&id])
            .await?;
        Ok(row.map(|r| Hala::from_row(&r)).transpose()?)
    }

    async fn list(&self) -> Result<Vec<Hala>, StoreError> {
        let client = self.db.pool().get().await?;
        let rows = client
            .query("SELECT id, nazwa, adres FROM hala ORDER BY id", &[])
            .await?;
        Ok(rows
            .iter()
            .map(Hala::from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn insert(&self, payload: HalaPayload) -> Result<Hala, StoreError> {
        let client = self.db.pool().get().await?;
        let row = client
            .query_one(
                "INSERT INTO hala (nazwa, adres) VALUES ($1, $2) RETURNING id, nazwa, adres",
                &[&payload.nazwa, &payload.adres],
            )
            .await?;
        Ok(Hala::from_row(&row)?)
    }

    async fn update(&self, id: i32, payload: HalaPayload) -> Result<bool, StoreError> {
        let client = self.db.pool().get().await?;
        let n = client
            .execute(
                "UPDATE hala SET nazwa = $1, adres = $2 WHERE id = $3",
                &[&payload.nazwa, &payload.adres, &id],
            )
            .await?;
        Ok(n > 0)
    }

    async fn delete(&self, id: i32) -> Result<Option<Hala>, StoreError> {
        let client = self.db.pool().get().await?;
        let row = client
            .query_opt(
                "DELETE FROM hala WHERE id = $1 RETURNING id, nazwa, adres",
                &[&id],
            )
            .await?;
        Ok(row.map(|r| Hala::from_row(&r)).transpose()?)
    }
}
