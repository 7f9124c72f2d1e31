//! Local cache store: keyed account and permission records.
//!
//! The cache owns account and permission data durably across sessions. It
//! accelerates *lookup* only; presence in the cache never stands in for a
//! live credential check. [`SqliteCache`] is the durable implementation,
//! [`MemoryCache`] serves tests and embedders.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Account;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache query failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("corrupt cache record: {0}")]
    Corrupt(String),
    #[error("cache backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up an account by its username.
    async fn find(&self, username: &str) -> Result<Option<Account>, CacheError>;

    /// Look up an account by its remote-assigned id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, CacheError>;

    /// Insert or merge-overwrite an account keyed by id. Incoming fields
    /// win; permission rows for the id are left untouched. Atomic with
    /// respect to a concurrent `find` for the same id.
    async fn upsert(&self, account: &Account) -> Result<(), CacheError>;

    /// Permission set for an account id; empty if none was ever stored.
    async fn permissions(&self, id: Uuid) -> Result<HashSet<String>, CacheError>;

    /// Replace the stored permission set for an account id.
    async fn set_permissions(
        &self,
        id: Uuid,
        permissions: &HashSet<String>,
    ) -> Result<(), CacheError>;

    /// Drop every cached account and permission set.
    async fn clear(&self) -> Result<(), CacheError>;
}
