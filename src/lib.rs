//! Data Gateway
//!
//! Serves a static JSON dataset behind:
//! - API keys with a per-key call quota (MongoDB or in-memory store)
//! - Fixed-window rate limiting per caller IP
//! - A read-through cache (Redis or in-memory)

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use api::state::AppState;
use domain::KeyStore;
use infrastructure::{
    api_key::{KeyIssuer, KeyStoreFactory},
    cache::CacheFactory,
    dataset::{DataService, DataServiceConfig, FileDataSource},
    rate_limiter::{RateLimitConfig, RateLimiter},
};

/// Create application state from configuration loaded from the environment
pub async fn create_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    create_app_state_with_config(&config).await
}

/// Create application state with the given configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let key_store = create_key_store(config).await?;

    let cache = CacheFactory::new()
        .create(&config.cache)
        .await
        .context("Failed to create cache")?;

    let source = Arc::new(FileDataSource::new(&config.dataset.path));
    let data_service = DataService::with_config(
        cache.clone(),
        source,
        DataServiceConfig::from(&config.dataset),
    );

    let rate_limiter = RateLimiter::new(RateLimitConfig::from(&config.rate_limit));

    info!(
        key_store = key_store.backend_name(),
        cache = cache.backend_name(),
        dataset = %config.dataset.path,
        default_limit = config.api_keys.default_limit,
        "Application state initialized"
    );

    Ok(AppState::new(
        key_store,
        cache,
        rate_limiter,
        data_service,
        config.api_keys.default_limit,
    ))
}

/// Create a key issuer without the rest of the serving stack
pub async fn create_key_issuer(config: &AppConfig) -> anyhow::Result<KeyIssuer> {
    let key_store = create_key_store(config).await?;
    Ok(KeyIssuer::new(key_store, config.api_keys.default_limit))
}

async fn create_key_store(config: &AppConfig) -> anyhow::Result<Arc<dyn KeyStore>> {
    KeyStoreFactory::new()
        .create(&config.key_store)
        .await
        .context("Failed to create key store")
}
