//! In-memory cache store for tests and embedders.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::auth::Account;
use crate::cache::{CacheError, CacheStore};

#[derive(Default)]
pub struct MemoryCache {
    inner: RwLock<State>,
}

#[derive(Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    permissions: HashMap<Uuid, HashSet<String>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn find(&self, username: &str) -> Result<Option<Account>, CacheError> {
        let state = self.inner.read();
        Ok(state
            .accounts
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, CacheError> {
        Ok(self.inner.read().accounts.get(&id).cloned())
    }

    async fn upsert(&self, account: &Account) -> Result<(), CacheError> {
        self.inner
            .write()
            .accounts
            .insert(account.id, account.clone());
        Ok(())
    }

    async fn permissions(&self, id: Uuid) -> Result<HashSet<String>, CacheError> {
        Ok(self
            .inner
            .read()
            .permissions
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_permissions(
        &self,
        id: Uuid,
        permissions: &HashSet<String>,
    ) -> Result<(), CacheError> {
        self.inner.write().permissions.insert(id, permissions.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut state = self.inner.write();
        state.accounts.clear();
        state.permissions.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn account(id: Uuid, username: &str) -> Account {
        Account {
            id,
            username: username.to_string(),
            employee_id: "E-1".to_string(),
            credential_digest: "digest".to_string(),
            is_synced: false,
            is_premium: false,
            role: None,
        }
    }

    #[tokio::test]
    async fn upsert_then_find_by_username_and_id() -> Result<()> {
        let cache = MemoryCache::new();
        let id = Uuid::new_v4();
        cache.upsert(&account(id, "alice")).await?;

        assert_eq!(
            cache.find("alice").await?.map(|a| a.id),
            Some(id),
            "username lookup"
        );
        assert!(cache.find_by_id(id).await?.is_some());
        assert!(cache.find("bob").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn upsert_same_id_overwrites_fields_keeps_permissions() -> Result<()> {
        let cache = MemoryCache::new();
        let id = Uuid::new_v4();
        cache.upsert(&account(id, "alice")).await?;
        cache
            .set_permissions(id, &HashSet::from(["dispense".to_string()]))
            .await?;

        let mut updated = account(id, "alice");
        updated.is_premium = true;
        updated.is_synced = true;
        cache.upsert(&updated).await?;

        let found = cache.find("alice").await?.expect("account present");
        assert!(found.is_premium);
        assert!(found.is_synced);
        assert!(cache.permissions(id).await?.contains("dispense"));
        Ok(())
    }

    #[tokio::test]
    async fn permissions_default_empty_and_replace() -> Result<()> {
        let cache = MemoryCache::new();
        let id = Uuid::new_v4();
        assert!(cache.permissions(id).await?.is_empty());

        cache
            .set_permissions(id, &HashSet::from(["a".to_string(), "b".to_string()]))
            .await?;
        cache
            .set_permissions(id, &HashSet::from(["c".to_string()]))
            .await?;

        let stored = cache.permissions(id).await?;
        assert_eq!(stored, HashSet::from(["c".to_string()]));
        Ok(())
    }

    #[tokio::test]
    async fn clear_drops_everything() -> Result<()> {
        let cache = MemoryCache::new();
        let id = Uuid::new_v4();
        cache.upsert(&account(id, "alice")).await?;
        cache
            .set_permissions(id, &HashSet::from(["dispense".to_string()]))
            .await?;

        cache.clear().await?;
        assert!(cache.find("alice").await?.is_none());
        assert!(cache.permissions(id).await?.is_empty());
        Ok(())
    }
}
