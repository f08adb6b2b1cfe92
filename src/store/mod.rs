//! redb-backed storage layer
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `users` | `user_id` | `User` (JSON) | Member records |
//! | `users_by_email` | `email` | `user_id` | Unique-email index |
//! | `items` | `item_id` | `Item` (JSON) | Catalog |
//! | `carts` | `user_id` | `BTreeSet<item_id>` (JSON) | Per-member cart set |
//! | `orders` | `order_id` | `Order` (JSON) | Order ledger (append + status CAS) |
//!
//! # Durability & concurrency
//!
//! redb commits with `Durability::Immediate`: once `commit()` returns the
//! write is persistent and the file is always in a consistent state. Write
//! transactions are serialized (single writer), which is what makes the
//! order ledger's "exactly one close wins" guarantee hold without any
//! in-process locking: contending closers each get their own transaction,
//! and the loser re-reads the committed `completed` status.

pub mod cart;
pub mod items;
pub mod models;
pub mod orders;
pub mod users;

use redb::{Database, ReadTransaction, ReadableDatabase, TableDefinition, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Member records: key = user_id, value = JSON-serialized `User`
const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Unique-email index: key = email (lowercased), value = user_id
const USERS_BY_EMAIL_TABLE: TableDefinition<&str, &str> = TableDefinition::new("users_by_email");

/// Catalog: key = item_id, value = JSON-serialized `Item`
const ITEMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("items");

/// Carts: key = user_id, value = JSON-serialized `BTreeSet<String>` of item ids
const CARTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("carts");

/// Order ledger: key = order_id, value = JSON-serialized `Order`
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate key: {0}")]
    Duplicate(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for crate::utils::AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Duplicate(msg) => crate::utils::AppError::conflict(msg),
            other => crate::utils::AppError::database(other.to_string()),
        }
    }
}

/// Marketplace storage backed by a single redb database
#[derive(Clone)]
pub struct MarketStore {
    db: Arc<Database>,
}

impl MarketStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Create all tables up front so that empty reads don't fail
    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS_TABLE)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL_TABLE)?;
            let _ = write_txn.open_table(ITEMS_TABLE)?;
            let _ = write_txn.open_table(CARTS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction (blocks until it is the single writer)
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction (snapshot of the latest committed state)
    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }
}
