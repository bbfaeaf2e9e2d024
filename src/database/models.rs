// Database Models
//
// Tokio-postgres compatible models for the facility records.
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Trait for converting from tokio-postgres Row
pub trait FromRow {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>
    where
        Self: Sized;
}

/// A factory hall: a named facility with an optional address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hala {
    pub id: i32,
    pub nazwa: String,
    pub adres: Option<String>,
}

impl FromRow for Hala {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            nazwa: row.try_get("nazwa")?,
            adres: row.try_get("adres")?,
        })
    }
}

/// Writable fields of a hall. Any `id` in the request body is ignored;
/// ids are assigned by the store and taken from the path on update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HalaPayload {
    #[serde(default)]
    pub nazwa: String,
    #[serde(default)]
    pub adres: Option<String>,
}

impl HalaPayload {
    pub fn into_hala(self, id: i32) -> Hala {
        Hala {
            id,
            nazwa: self.nazwa,
            adres: self.adres,
        }
    }
}
