//! API key issuance page

use askama::Template;
use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Router,
};
use tracing::{debug, error};

use super::state::AppState;
use super::types::ApiError;

/// View model for the issuance page; `api_key` is set after a POST
#[derive(Debug, Default, Template)]
#[template(path = "generate_api_key.html")]
pub struct GenerateApiKeyView {
    pub api_key: Option<String>,
}

impl GenerateApiKeyView {
    pub fn issued(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
        }
    }
}

/// Key issuance routes; the form answers with and without a trailing slash
pub fn create_key_issuer_router() -> Router<AppState> {
    Router::new()
        .route("/generateApiKey", get(show_form))
        .route("/generateApiKey/", get(show_form))
        .route("/generateApiKey/generate", post(generate_key))
}

/// GET /generateApiKey/
pub async fn show_form() -> Result<Html<String>, ApiError> {
    render_template(&GenerateApiKeyView::default())
}

/// POST /generateApiKey/generate
pub async fn generate_key(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    debug!("Issuing API key from web form");

    let api_key = state.key_issuer.issue().await?;

    render_template(&GenerateApiKeyView::issued(api_key.key()))
}

fn render_template<T: Template>(template: &T) -> Result<Html<String>, ApiError> {
    template.render().map(Html).map_err(|e| {
        error!(error = %e, "Template rendering failed");
        ApiError::internal("Template rendering error")
    })
}
