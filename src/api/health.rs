//! Liveness and backend connection diagnostics

use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use futures::future;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::{Cache, CacheExt, DomainError, KeyStore};

use super::state::AppState;
use super::types::ApiError;

const CONNECTION_CHECK_KEY: &str = "test_connection";
const CONNECTION_CHECK_TTL: Duration = Duration::from_secs(60);

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Backend reachability as human readable strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub mongodb: String,
    pub redis: String,
}

/// Simple health check - returns 200 if the process is serving
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Probe the key store and the cache without touching quota or rate state
pub async fn check_connections(
    State(state): State<AppState>,
) -> Result<Json<ConnectionStatus>, ApiError> {
    let (mongodb, redis) = future::try_join(
        probe_key_store(state.key_store.as_ref()),
        probe_cache(state.cache.as_ref()),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Connection check failed");
        ApiError::internal("Connection check failed")
    })?;

    info!(key_store = %mongodb, cache = %redis, "Connection check completed");

    Ok(Json(ConnectionStatus { mongodb, redis }))
}

/// Connected means at least one key record can be read back
async fn probe_key_store(store: &dyn KeyStore) -> Result<String, DomainError> {
    let found = store.find_any().await?;
    Ok(status_line(store.backend_name(), found.is_some()))
}

/// Connected means a sentinel value survives a set/get round trip
async fn probe_cache(cache: &dyn Cache) -> Result<String, DomainError> {
    let sentinel = format!("{} connected", cache.backend_name());

    cache
        .set_json(CONNECTION_CHECK_KEY, &sentinel, CONNECTION_CHECK_TTL)
        .await?;
    let read_back: Option<String> = cache.get_json(CONNECTION_CHECK_KEY).await?;

    Ok(status_line(cache.backend_name(), read_back.is_some()))
}

fn status_line(backend: &str, connected: bool) -> String {
    if connected {
        format!("{} connected", backend)
    } else {
        format!("{} not connected", backend)
    }
}
