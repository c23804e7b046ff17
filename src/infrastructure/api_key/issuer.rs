//! API key issuance

use std::sync::Arc;

use tracing::info;

use crate::domain::api_key::{ApiKey, KeyStore, PersistenceError};

use super::generator::ApiKeyGenerator;

/// Creates and persists new API keys with the configured default quota
#[derive(Debug, Clone)]
pub struct KeyIssuer {
    store: Arc<dyn KeyStore>,
    generator: ApiKeyGenerator,
    default_limit: i64,
}

impl KeyIssuer {
    pub fn new(store: Arc<dyn KeyStore>, default_limit: i64) -> Self {
        Self {
            store,
            generator: ApiKeyGenerator::new(),
            default_limit,
        }
    }

    /// Issue a fresh key. The returned value is the caller's only credential.
    pub async fn issue(&self) -> Result<ApiKey, PersistenceError> {
        let api_key = ApiKey::new(self.generator.generate(), self.default_limit)?;

        let created = self.store.create(api_key).await?;
        info!(limit = created.limit(), "API key issued");

        Ok(created)
    }

    pub fn default_limit(&self) -> i64 {
        self.default_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::MockKeyStore;

    #[tokio::test]
    async fn test_issue_uses_default_limit() {
        let store = Arc::new(MockKeyStore::new());
        let issuer = KeyIssuer::new(store.clone(), 100);

        let issued = issuer.issue().await.unwrap();

        assert_eq!(issued.limit(), 100);
        assert_eq!(store.limit_of(issued.key()).await, Some(100));
    }

    #[tokio::test]
    async fn test_issued_keys_are_unique() {
        let store = Arc::new(MockKeyStore::new());
        let issuer = KeyIssuer::new(store, 7);

        let first = issuer.issue().await.unwrap();
        let second = issuer.issue().await.unwrap();

        assert_ne!(first.key(), second.key());
        assert_eq!(second.limit(), 7);
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_error() {
        let store = Arc::new(MockKeyStore::new());
        store.set_should_fail(true).await;
        let issuer = KeyIssuer::new(store, 100);

        let result = issuer.issue().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_negative_default_limit_rejected() {
        let issuer = KeyIssuer::new(Arc::new(MockKeyStore::new()), -5);

        assert!(issuer.issue().await.is_err());
    }
}
