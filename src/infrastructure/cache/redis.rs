//! Redis-backed cache

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::info;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// e.g. "redis://:password@127.0.0.1:6379/0"
    pub url: String,
    /// Namespace joined to every key with ':'
    pub key_prefix: Option<String>,
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key_prefix: None,
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    fn namespaced(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

/// Cache whose expiry is enforced by Redis (`SET key value EX seconds`)
///
/// `ConnectionManager` is a cheap clone that re-establishes a dropped
/// connection on the next command.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("key_prefix", &self.config.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Connects eagerly so a bad URL fails at startup
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Invalid Redis URL: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Redis connection failed: {}", e)))?;

        info!(key_prefix = ?config.key_prefix, "Redis cache connected");

        Ok(Self { connection, config })
    }
}

/// Redis expiry has one-second resolution; never send `EX 0`
fn expiry_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut connection = self.connection.clone();

        connection
            .get(self.config.namespaced(key))
            .await
            .map_err(|e| DomainError::cache(format!("GET {} failed: {}", key, e)))
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let mut connection = self.connection.clone();

        connection
            .set_ex::<_, _, ()>(self.config.namespaced(key), value, expiry_secs(ttl))
            .await
            .map_err(|e| DomainError::cache(format!("SET {} failed: {}", key, e)))
    }

    fn backend_name(&self) -> &'static str {
        "Redis"
    }
}
