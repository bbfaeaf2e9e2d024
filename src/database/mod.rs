//! # Database Module
//!
//! PostgreSQL integration through tokio-postgres and deadpool, plus the
//! record store the hall endpoints are written against.

pub mod connection;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod store;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use memory::MemoryHalaStore;
pub use models::{Hala, HalaPayload};
pub use store::{HalaStore, PgHalaStore, StoreError};
