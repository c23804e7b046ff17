//! Read-through dataset service

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::DatasetConfig;
use crate::domain::cache::Cache;
use crate::domain::dataset::{DataError, DataSource, Dataset};
use crate::domain::DomainError;

/// Configuration for dataset caching
#[derive(Debug, Clone)]
pub struct DataServiceConfig {
    /// Single well-known cache key; the dataset is process-global
    pub cache_key: String,
    /// How long a cached copy is served before the source is read again
    pub ttl: Duration,
}

impl Default for DataServiceConfig {
    fn default() -> Self {
        Self {
            cache_key: "api_data".to_string(),
            ttl: Duration::from_secs(1800), // 30 minutes
        }
    }
}

impl DataServiceConfig {
    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = key.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl From<&DatasetConfig> for DataServiceConfig {
    fn from(config: &DatasetConfig) -> Self {
        Self {
            cache_key: config.cache_key.clone(),
            ttl: Duration::from_secs(config.ttl_secs),
        }
    }
}

/// Serves the dataset from cache, falling back to the source on a miss
///
/// There is no single-flight guard: concurrent misses each load from the
/// source and write the same payload back.
pub struct DataService {
    cache: Arc<dyn Cache>,
    source: Arc<dyn DataSource>,
    config: DataServiceConfig,
}

impl fmt::Debug for DataService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataService")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}

impl DataService {
    pub fn new(cache: Arc<dyn Cache>, source: Arc<dyn DataSource>) -> Self {
        Self::with_config(cache, source, DataServiceConfig::default())
    }

    pub fn with_config(
        cache: Arc<dyn Cache>,
        source: Arc<dyn DataSource>,
        config: DataServiceConfig,
    ) -> Self {
        Self {
            cache,
            source,
            config,
        }
    }

    /// Returns the dataset, loading and caching it on a miss.
    ///
    /// Cache failures degrade to the source; only a failing source is an
    /// error.
    pub async fn get_dataset(&self) -> Result<Dataset, DataError> {
        match self.read_cached().await {
            Ok(Some(dataset)) => {
                info!(cache_key = %self.config.cache_key, "Serving data from cache");
                return Ok(dataset);
            }
            Ok(None) => debug!(cache_key = %self.config.cache_key, "Dataset cache miss"),
            Err(e) => warn!(error = %e, "Cache read failed, loading dataset from source"),
        }

        let dataset = self
            .source
            .load()
            .await
            .map_err(DataError::SourceUnavailable)?;

        match self.write_cached(&dataset).await {
            Ok(()) => info!(
                cache_key = %self.config.cache_key,
                ttl_secs = self.config.ttl.as_secs(),
                "Data fetched from source and cached"
            ),
            Err(e) => warn!(error = %e, "Failed to cache dataset, serving fresh copy"),
        }

        Ok(dataset)
    }

    async fn read_cached(&self) -> Result<Option<Dataset>, DataError> {
        let raw = self
            .cache
            .get(&self.config.cache_key)
            .await
            .map_err(DataError::CacheUnavailable)?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str::<Dataset>(&raw) {
            Ok(dataset) => Ok(Some(dataset)),
            Err(e) => {
                // A corrupt entry is treated like an expired one
                warn!(error = %e, "Discarding unreadable cached dataset");
                Ok(None)
            }
        }
    }

    async fn write_cached(&self, dataset: &Dataset) -> Result<(), DataError> {
        let payload = serde_json::to_string(dataset).map_err(|e| {
            DataError::CacheUnavailable(DomainError::cache(format!(
                "Failed to serialize dataset: {}",
                e
            )))
        })?;

        self.cache
            .set_with_expiry(&self.config.cache_key, &payload, self.config.ttl)
            .await
            .map_err(DataError::CacheUnavailable)
    }
}
