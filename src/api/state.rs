//! Application state for shared services

use std::sync::Arc;

use crate::domain::api_key::KeyStore;
use crate::domain::cache::Cache;
use crate::infrastructure::api_key::{AuthGate, KeyIssuer};
use crate::infrastructure::dataset::DataService;
use crate::infrastructure::rate_limiter::RateLimiter;

/// Process-wide services, built once at startup and shared by every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub auth_gate: Arc<AuthGate>,
    pub rate_limiter: Arc<RateLimiter>,
    pub data_service: Arc<DataService>,
    pub key_issuer: Arc<KeyIssuer>,
    pub key_store: Arc<dyn KeyStore>,
    pub cache: Arc<dyn Cache>,
}

impl AppState {
    /// Wire the admission pipeline around one key store and one cache
    pub fn new(
        key_store: Arc<dyn KeyStore>,
        cache: Arc<dyn Cache>,
        rate_limiter: RateLimiter,
        data_service: DataService,
        default_limit: i64,
    ) -> Self {
        Self {
            auth_gate: Arc::new(AuthGate::new(key_store.clone())),
            rate_limiter: Arc::new(rate_limiter),
            data_service: Arc::new(data_service),
            key_issuer: Arc::new(KeyIssuer::new(key_store.clone(), default_limit)),
            key_store,
            cache,
        }
    }
}
