//! Request admission: API key quota first, then per-caller rate limiting

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Query, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;

const UNKNOWN_CALLER: &str = "unknown";

#[derive(Debug, Default, Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

/// Guards `/api` data routes.
///
/// The quota decrement is awaited before the rate limiter runs, so a request
/// rejected by the rate limiter has still spent one call of its key's quota.
/// On success the admitted [`ApiKey`](crate::domain::ApiKey) is placed in the
/// request extensions.
pub async fn admission_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = presented_api_key(&request);
    let api_key = state.auth_gate.authenticate(presented.as_deref()).await?;

    let caller = caller_id(&request);
    let remaining = state
        .rate_limiter
        .allow(&caller, Instant::now())
        .await
        .inspect_err(|_| warn!(caller = %caller, "Rate limit exceeded"))?;

    info!(caller = %caller, remaining_requests = remaining, "Request admitted");

    request.extensions_mut().insert(api_key);
    let mut response = next.run(request).await;

    let limit = state.rate_limiter.config().max_requests;
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-ratelimit-limit"),
        HeaderValue::from(limit),
    );
    headers.insert(
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderValue::from(remaining),
    );

    Ok(response)
}

/// The `api_key` query parameter; an unparsable query counts as absent
fn presented_api_key(request: &Request) -> Option<String> {
    Query::<ApiKeyQuery>::try_from_uri(request.uri())
        .map(|Query(query)| query.api_key)
        .unwrap_or_default()
}

/// Rate-limit identity: the peer IP address
fn caller_id(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CALLER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_presented_api_key() {
        assert_eq!(
            presented_api_key(&request("/api/data?api_key=abc-123")),
            Some("abc-123".to_string())
        );
        assert_eq!(presented_api_key(&request("/api/data")), None);
        assert_eq!(presented_api_key(&request("/api/data?other=1")), None);
    }

    #[test]
    fn test_presented_api_key_decodes() {
        assert_eq!(
            presented_api_key(&request("/api/data?api_key=a%2Bb")),
            Some("a+b".to_string())
        );
    }

    #[test]
    fn test_caller_id_from_connect_info() {
        let mut req = request("/api/data");
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 1, 2, 3], 55123))));

        assert_eq!(caller_id(&req), "10.1.2.3");
    }

    #[test]
    fn test_caller_id_without_connect_info() {
        assert_eq!(caller_id(&request("/api/data")), UNKNOWN_CALLER);
    }
}
