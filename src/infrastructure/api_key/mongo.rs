//! MongoDB key store implementation

use std::fmt;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use tracing::info;

use crate::domain::api_key::{ApiKey, KeyStore};
use crate::domain::DomainError;

/// Configuration for the MongoDB key store
#[derive(Debug, Clone)]
pub struct MongoKeyStoreConfig {
    /// Connection string, e.g. "mongodb://localhost:27017/gateway"
    pub uri: String,
    /// Database used when the connection string does not name one
    pub database: String,
    pub collection: String,
}

impl MongoKeyStoreConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: "test".to_string(),
            collection: "apikeys".to_string(),
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}

/// Key store backed by a MongoDB collection of `{ key, limit }` documents
///
/// Quota decrements use `findOneAndUpdate` with a `limit > 0` filter and an
/// `$inc`, so concurrent requests for one key never race in process memory.
#[derive(Clone)]
pub struct MongoKeyStore {
    collection: Collection<ApiKey>,
}

impl fmt::Debug for MongoKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoKeyStore")
            .field("collection", &self.collection.name())
            .finish()
    }
}

impl MongoKeyStore {
    /// Creates the client; the driver connects lazily on first use
    pub async fn new(config: MongoKeyStoreConfig) -> Result<Self, DomainError> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create MongoDB client: {}", e)))?;

        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.database));

        info!(
            database = %database.name(),
            collection = %config.collection,
            "MongoDB key store configured"
        );

        Ok(Self {
            collection: database.collection(&config.collection),
        })
    }
}

#[async_trait]
impl KeyStore for MongoKeyStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, DomainError> {
        self.collection
            .find_one(doc! { "key": key })
            .await
            .map_err(|e| DomainError::storage(format!("Failed to look up API key: {}", e)))
    }

    async fn find_any(&self) -> Result<Option<ApiKey>, DomainError> {
        self.collection
            .find_one(doc! {})
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query API keys: {}", e)))
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        self.collection
            .insert_one(&api_key)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to insert API key: {}", e)))?;

        Ok(api_key)
    }

    async fn decrement_quota(&self, key: &str) -> Result<Option<ApiKey>, DomainError> {
        self.collection
            .find_one_and_update(
                doc! { "key": key, "limit": { "$gt": 0 } },
                doc! { "$inc": { "limit": -1 } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to decrement API key quota: {}", e)))
    }

    fn backend_name(&self) -> &'static str {
        "MongoDB"
    }
}
