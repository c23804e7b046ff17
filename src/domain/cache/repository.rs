//! Cache contract

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// String key/value store where every entry carries its own expiry
///
/// Values are JSON text so the trait stays dyn-compatible; [`CacheExt`]
/// layers typed access on top.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Stored value, or `None` when absent or past its expiry
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Store `value`, replacing any previous entry and re-arming its expiry
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration)
        -> Result<(), DomainError>;

    /// Name reported by connection diagnostics
    fn backend_name(&self) -> &'static str;
}

/// Typed JSON access for any [`Cache`]
pub trait CacheExt: Cache {
    fn get_json<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<Option<V>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            let Some(raw) = self.get(key).await? else {
                return Ok(None);
            };

            serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| DomainError::cache(format!("Unreadable value at '{}': {}", key, e)))
        }
    }

    fn set_json<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let raw = serde_json::to_string(value).map_err(|e| {
                DomainError::cache(format!("Value for '{}' is not serializable: {}", key, e))
            })?;
            self.set_with_expiry(key, &raw, ttl).await
        }
    }
}

impl<T: Cache + ?Sized> CacheExt for T {}
