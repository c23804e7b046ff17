//! HTTP error responses

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{AuthError, DataError, DomainError, PersistenceError};
use crate::infrastructure::rate_limiter::RateLimited;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const DATA_LOAD_ERROR_MESSAGE: &str = "Failed to load data from JSON";

/// Error body: `{ "error": "<message>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// API error with status code and optional extra headers
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
    pub headers: HeaderMap,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
            },
            headers: HeaderMap::new(),
        }
    }

    /// Attach a response header
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn message(&self) -> &str {
        &self.response.error
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.response)).into_response();
        response.headers_mut().extend(self.headers);
        response
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingKey => Self::unauthorized(err.to_string()),
            AuthError::InvalidKey => Self::forbidden(err.to_string()),
            AuthError::QuotaExhausted => Self::too_many_requests(err.to_string()),
            AuthError::Store(source) => {
                error!(error = %source, "Key store failure during authentication");
                Self::internal(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl From<RateLimited> for ApiError {
    fn from(err: RateLimited) -> Self {
        // Round up so clients never retry inside the closed window
        let retry_secs = err.retry_after.as_secs() + u64::from(err.retry_after.subsec_nanos() > 0);

        Self::too_many_requests(err.message)
            .with_header(header::RETRY_AFTER, HeaderValue::from(retry_secs))
            .with_header(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(err.limit),
            )
            .with_header(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(0u32),
            )
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        error!(error = %err, "Dataset request failed");
        match err {
            DataError::SourceUnavailable(_) => Self::internal(DATA_LOAD_ERROR_MESSAGE),
            DataError::CacheUnavailable(_) => Self::internal(INTERNAL_ERROR_MESSAGE),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Failed to issue API key");
        Self::internal(INTERNAL_ERROR_MESSAGE)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        error!(error = %err, "Request failed");
        Self::internal(INTERNAL_ERROR_MESSAGE)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.error)
    }
}

impl std::error::Error for ApiError {}
