//! Dataset endpoints behind API key admission

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use tracing::debug;

use crate::domain::Dataset;

use super::health;
use super::middleware::admission_middleware;
use super::state::AppState;
use super::types::ApiError;

/// Routes mounted under `/api`.
///
/// Every `/api` path except `check-connections` passes admission, including
/// unknown ones, which spend quota before answering 404. `check-connections`
/// never touches quota or rate state.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let admitted = Router::new()
        .route("/data", get(get_data))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state, admission_middleware));

    Router::new()
        .route("/check-connections", get(health::check_connections))
        .merge(admitted)
}

/// GET /api/data
pub async fn get_data(State(state): State<AppState>) -> Result<Json<Dataset>, ApiError> {
    debug!("Serving dataset");

    let dataset = state.data_service.get_dataset().await?;

    Ok(Json(dataset))
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}
