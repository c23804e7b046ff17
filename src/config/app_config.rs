use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub key_store: KeyStoreConfig,
    pub cache: CacheSettings,
    pub api_keys: ApiKeyConfig,
    pub rate_limit: RateLimitSettings,
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for any path not matched by a route
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where API keys and their remaining quota live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyStoreConfig {
    /// `in_memory` or `mongodb`
    pub backend: String,
    pub uri: Option<String>,
    /// Used when the URI does not name a database
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// `in_memory` or `redis`
    pub backend: String,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiKeyConfig {
    /// Quota given to every newly issued key
    pub default_limit: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub window_secs: u64,
    pub max_requests: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: String,
    pub cache_key: String,
    pub ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "public".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for KeyStoreConfig {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            uri: None,
            database: "test".to_string(),
            collection: "apikeys".to_string(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            redis_url: None,
            key_prefix: None,
            max_capacity: 10_000,
        }
    }
}

impl Default for ApiKeyConfig {
    fn default() -> Self {
        Self { default_limit: 100 }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: 300,
            max_requests: 10,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: "data.json".to_string(),
            cache_key: "api_data".to_string(),
            ttl_secs: 1800,
        }
    }
}

impl AppConfig {
    /// Loads configuration from files, `APP__*` variables and the plain
    /// `PORT`, `MONGODB_URI`, `API_KEY_LIMIT` and `REDIS_URL` variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    pub fn load_with<F>(lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let mongodb_uri = lookup("MONGODB_URI").filter(|v| !v.is_empty());
        let redis_url = lookup("REDIS_URL").filter(|v| !v.is_empty());

        let config = builder
            .set_override_option("server.port", lookup("PORT"))?
            .set_override_option("api_keys.default_limit", lookup("API_KEY_LIMIT"))?
            .set_override_option("key_store.backend", mongodb_uri.as_ref().map(|_| "mongodb"))?
            .set_override_option("key_store.uri", mongodb_uri)?
            .set_override_option("cache.backend", redis_url.as_ref().map(|_| "redis"))?
            .set_override_option("cache.redis_url", redis_url)?
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;

        if app_config.api_keys.default_limit < 0 {
            return Err(config::ConfigError::Message(format!(
                "api_keys.default_limit must be non-negative, got {}",
                app_config.api_keys.default_limit
            )));
        }

        Ok(app_config)
    }
}
