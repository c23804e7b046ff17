//! Key store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::ApiKey;
use crate::domain::DomainError;

/// Persistent store for API keys and their remaining quota
#[async_trait]
pub trait KeyStore: Send + Sync + Debug {
    /// Exact-match lookup by key value
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, DomainError>;

    /// Any one record, used to probe that the store is reachable and populated
    async fn find_any(&self) -> Result<Option<ApiKey>, DomainError>;

    /// Persist a newly issued key
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Atomically take one call off the key's quota.
    ///
    /// Only matches a record whose limit is still above zero, so the quota can
    /// never go negative. Returns the updated record, or `None` when no record
    /// with remaining quota matched.
    async fn decrement_quota(&self, key: &str) -> Result<Option<ApiKey>, DomainError>;

    /// Human readable backend name used in connection diagnostics
    fn backend_name(&self) -> &'static str;
}
