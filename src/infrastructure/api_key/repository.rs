//! In-memory key store implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::api_key::{ApiKey, KeyStore};
use crate::domain::DomainError;

/// In-memory implementation of KeyStore
///
/// The quota check and decrement happen under a single write lock, which is
/// this store's equivalent of a conditional atomic update.
#[derive(Debug, Default)]
pub struct InMemoryKeyStore {
    keys: Arc<RwLock<HashMap<String, ApiKey>>>,
}

impl InMemoryKeyStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial keys
    pub fn with_keys(keys: Vec<ApiKey>) -> Self {
        let keys_map: HashMap<String, ApiKey> = keys
            .into_iter()
            .map(|k| (k.key().to_string(), k))
            .collect();

        Self {
            keys: Arc::new(RwLock::new(keys_map)),
        }
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.get(key).cloned())
    }

    async fn find_any(&self) -> Result<Option<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.values().next().cloned())
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;

        if keys.contains_key(api_key.key()) {
            return Err(DomainError::conflict("API key already exists"));
        }

        keys.insert(api_key.key().to_string(), api_key.clone());
        Ok(api_key)
    }

    async fn decrement_quota(&self, key: &str) -> Result<Option<ApiKey>, DomainError> {
        let mut keys = self.keys.write().await;

        match keys.get_mut(key) {
            Some(record) => Ok(record.consume().then(|| record.clone())),
            None => Ok(None),
        }
    }

    fn backend_name(&self) -> &'static str {
        "In-memory key store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str, limit: i64) -> ApiKey {
        ApiKey::new(value, limit).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryKeyStore::new();

        store.create(key("key-1", 100)).await.unwrap();

        let found = store.find_by_key("key-1").await.unwrap().unwrap();
        assert_eq!(found.limit(), 100);
        assert!(store.find_by_key("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_fails() {
        let store = InMemoryKeyStore::new();

        store.create(key("key-1", 100)).await.unwrap();
        let result = store.create(key("key-1", 5)).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_find_any() {
        let store = InMemoryKeyStore::new();
        assert!(store.find_any().await.unwrap().is_none());

        store.create(key("key-1", 1)).await.unwrap();
        assert!(store.find_any().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_decrement_returns_updated_record() {
        let store = InMemoryKeyStore::with_keys(vec![key("key-1", 2)]);

        let updated = store.decrement_quota("key-1").await.unwrap().unwrap();
        assert_eq!(updated.limit(), 1);

        let stored = store.find_by_key("key-1").await.unwrap().unwrap();
        assert_eq!(stored.limit(), 1);
    }

    #[tokio::test]
    async fn test_decrement_never_goes_negative() {
        let store = InMemoryKeyStore::with_keys(vec![key("key-1", 0)]);

        assert!(store.decrement_quota("key-1").await.unwrap().is_none());

        let stored = store.find_by_key("key-1").await.unwrap().unwrap();
        assert_eq!(stored.limit(), 0);
    }

    #[tokio::test]
    async fn test_decrement_takes_last_unit_once() {
        let store = InMemoryKeyStore::with_keys(vec![key("key-1", 1)]);

        let updated = store.decrement_quota("key-1").await.unwrap();
        assert_eq!(updated.map(|k| k.limit()), Some(0));
        assert!(store.decrement_quota("key-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_decrement_unknown_key() {
        let store = InMemoryKeyStore::new();
        assert!(store.decrement_quota("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_decrements_consume_exactly_the_quota() {
        let store = Arc::new(InMemoryKeyStore::with_keys(vec![key("key-1", 5)]));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.decrement_quota("key-1").await.unwrap() })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 5);
        let stored = store.find_by_key("key-1").await.unwrap().unwrap();
        assert_eq!(stored.limit(), 0);
    }
}
