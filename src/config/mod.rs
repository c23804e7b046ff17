//! Application configuration

mod app_config;

pub use app_config::{
    ApiKeyConfig, AppConfig, CacheSettings, DatasetConfig, KeyStoreConfig, LogFormat,
    LoggingConfig, RateLimitSettings, ServerConfig,
};
