//! API key admission
//!
//! Checks a presented key against the key store and takes one call off its
//! quota before the request goes any further.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::api_key::{ApiKey, AuthError, KeyStore};

/// Validates API keys and enforces per-key quota
#[derive(Debug, Clone)]
pub struct AuthGate {
    store: Arc<dyn KeyStore>,
}

impl AuthGate {
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self { store }
    }

    /// Authenticate a request and consume one call of its key's quota.
    ///
    /// Returns the record as it is after the decrement. The decrement is the
    /// store's conditional update, so a key whose last call was taken by a
    /// concurrent request is rejected rather than driven below zero.
    pub async fn authenticate(&self, presented_key: Option<&str>) -> Result<ApiKey, AuthError> {
        let key = presented_key
            .filter(|k| !k.is_empty())
            .ok_or(AuthError::MissingKey)?;

        debug!(
            key_prefix = %key.chars().take(8).collect::<String>(),
            "Validating API key"
        );

        let record = self
            .store
            .find_by_key(key)
            .await?
            .ok_or(AuthError::InvalidKey)?;

        if !record.has_quota() {
            debug!("API key quota exhausted");
            return Err(AuthError::QuotaExhausted);
        }

        let updated = self
            .store
            .decrement_quota(key)
            .await?
            .ok_or(AuthError::QuotaExhausted)?;

        info!(remaining_quota = updated.limit(), "API key admitted");

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::MockKeyStore;

    fn gate_with(keys: Vec<ApiKey>) -> (AuthGate, Arc<MockKeyStore>) {
        let store = Arc::new(MockKeyStore::with_keys(keys));
        (AuthGate::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_missing_key() {
        let (gate, store) = gate_with(vec![]);

        let result = gate.authenticate(None).await;

        assert!(matches!(result, Err(AuthError::MissingKey)));
        assert_eq!(store.decrement_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_key_is_missing() {
        let (gate, _) = gate_with(vec![]);

        let result = gate.authenticate(Some("")).await;
        assert!(matches!(result, Err(AuthError::MissingKey)));
    }

    #[tokio::test]
    async fn test_unknown_key() {
        let (gate, store) = gate_with(vec![ApiKey::new("real", 5).unwrap()]);

        let result = gate.authenticate(Some("zzz")).await;

        assert!(matches!(result, Err(AuthError::InvalidKey)));
        assert_eq!(store.decrement_calls(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_key() {
        let (gate, store) = gate_with(vec![ApiKey::new("spent", 0).unwrap()]);

        for _ in 0..3 {
            let result = gate.authenticate(Some("spent")).await;
            assert!(matches!(result, Err(AuthError::QuotaExhausted)));
        }

        assert_eq!(store.decrement_calls(), 0);
        assert_eq!(store.limit_of("spent").await, Some(0));
    }

    #[tokio::test]
    async fn test_success_decrements_once() {
        let (gate, store) = gate_with(vec![ApiKey::new("good", 3).unwrap()]);

        let admitted = gate.authenticate(Some("good")).await.unwrap();

        assert_eq!(admitted.limit(), 2);
        assert_eq!(store.decrement_calls(), 1);
        assert_eq!(store.limit_of("good").await, Some(2));
    }

    #[tokio::test]
    async fn test_last_call_then_exhausted() {
        let (gate, store) = gate_with(vec![ApiKey::new("one", 1).unwrap()]);

        let admitted = gate.authenticate(Some("one")).await.unwrap();
        assert_eq!(admitted.limit(), 0);

        let second = gate.authenticate(Some("one")).await;
        assert!(matches!(second, Err(AuthError::QuotaExhausted)));
        assert_eq!(store.limit_of("one").await, Some(0));
    }

    #[tokio::test]
    async fn test_store_failure_is_hard_error() {
        let (gate, store) = gate_with(vec![ApiKey::new("good", 3).unwrap()]);
        store.set_should_fail(true).await;

        let result = gate.authenticate(Some("good")).await;
        assert!(matches!(result, Err(AuthError::Store(_))));
    }
}
