//! Key store factory for runtime selection

use std::sync::Arc;

use tracing::info;

use crate::config::KeyStoreConfig;
use crate::domain::api_key::KeyStore;
use crate::domain::DomainError;

use super::mongo::{MongoKeyStore, MongoKeyStoreConfig};
use super::repository::InMemoryKeyStore;

/// Supported key store backends
#[derive(Debug, Clone, PartialEq, Default)]
pub enum KeyStoreType {
    #[default]
    InMemory,
    MongoDb,
}

impl std::fmt::Display for KeyStoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyStoreType::InMemory => write!(f, "in_memory"),
            KeyStoreType::MongoDb => write!(f, "mongodb"),
        }
    }
}

impl std::str::FromStr for KeyStoreType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(KeyStoreType::InMemory),
            "mongodb" | "mongo" => Ok(KeyStoreType::MongoDb),
            _ => Err(DomainError::configuration(format!(
                "Unknown key store type: {}. Valid types: in_memory, mongodb",
                s
            ))),
        }
    }
}

/// Builds the configured key store
#[derive(Debug, Default)]
pub struct KeyStoreFactory;

impl KeyStoreFactory {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(&self, config: &KeyStoreConfig) -> Result<Arc<dyn KeyStore>, DomainError> {
        let store_type: KeyStoreType = config.backend.parse()?;
        info!("Key store backend: {}", store_type);

        match store_type {
            KeyStoreType::InMemory => Ok(Arc::new(InMemoryKeyStore::new())),
            KeyStoreType::MongoDb => {
                let uri = config.uri.clone().ok_or_else(|| {
                    DomainError::configuration("MONGODB_URI is required for the mongodb key store")
                })?;

                let mongo_config = MongoKeyStoreConfig::new(uri)
                    .with_database(&config.database)
                    .with_collection(&config.collection);

                Ok(Arc::new(MongoKeyStore::new(mongo_config).await?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_store_type_from_str() {
        assert_eq!(
            "in_memory".parse::<KeyStoreType>().unwrap(),
            KeyStoreType::InMemory
        );
        assert_eq!(
            "MongoDB".parse::<KeyStoreType>().unwrap(),
            KeyStoreType::MongoDb
        );
        assert!("postgres".parse::<KeyStoreType>().is_err());
    }

    #[tokio::test]
    async fn test_factory_defaults_to_in_memory() {
        let store = KeyStoreFactory::new()
            .create(&KeyStoreConfig::default())
            .await
            .unwrap();

        assert_eq!(store.backend_name(), "In-memory key store");
    }

    #[tokio::test]
    async fn test_factory_mongodb_requires_uri() {
        let config = KeyStoreConfig {
            backend: "mongodb".to_string(),
            uri: None,
            ..Default::default()
        };

        let result = KeyStoreFactory::new().create(&config).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
