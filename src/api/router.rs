use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::data;
use super::health;
use super::key_issuer;
use super::middleware::logging_middleware;
use super::state::AppState;

/// Create the full router with application state.
///
/// Unmatched paths fall through to static files under `static_dir`.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", data::create_api_router(state.clone()))
        .merge(key_issuer::create_key_issuer_router())
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
