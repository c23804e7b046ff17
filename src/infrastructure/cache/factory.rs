//! Cache backend selection

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::config::CacheSettings;
use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::{RedisCache, RedisCacheConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheType {
    #[default]
    InMemory,
    Redis,
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CacheType::InMemory => "in_memory",
            CacheType::Redis => "redis",
        })
    }
}

impl FromStr for CacheType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(CacheType::InMemory),
            "redis" => Ok(CacheType::Redis),
            other => Err(DomainError::configuration(format!(
                "Unknown cache backend '{}' (expected in_memory or redis)",
                other
            ))),
        }
    }
}

/// Builds the cache named by `cache.backend`
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(&self, settings: &CacheSettings) -> Result<Arc<dyn Cache>, DomainError> {
        let cache_type: CacheType = settings.backend.parse()?;
        info!(backend = %cache_type, "Creating cache");

        match cache_type {
            CacheType::InMemory => {
                let config =
                    InMemoryCacheConfig::default().with_max_capacity(settings.max_capacity);
                Ok(Arc::new(InMemoryCache::with_config(config)))
            }
            CacheType::Redis => {
                let url = settings.redis_url.as_deref().ok_or_else(|| {
                    DomainError::configuration("REDIS_URL is required for the redis cache")
                })?;

                let config = match &settings.key_prefix {
                    Some(prefix) => RedisCacheConfig::new(url).with_key_prefix(prefix),
                    None => RedisCacheConfig::new(url),
                };

                Ok(Arc::new(RedisCache::new(config).await?))
            }
        }
    }
}
