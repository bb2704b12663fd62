//! Admission Middleware
//!
//! Gates requests on the per-caller limiter: the caller's key is extracted
//! from the request, its bucket is consulted, and a rejected request is
//! answered with 429 and a short JSON body without reaching the handler.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use super::handlers::AppState;
use crate::models::ErrorResponse;

/// Key used when no caller identity can be determined.
const UNKNOWN_CALLER: &str = "unknown";

/// Admission-control middleware.
///
/// Apply with `axum::middleware::from_fn_with_state` to the routes that
/// should be rate limited.
pub async fn admission_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let key = caller_key(&request);

    if state.limiter.check(&key).await {
        next.run(request).await
    } else {
        debug!("Admission denied for caller {}", key);
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new("too many requests")),
        )
            .into_response()
    }
}

/// Extracts the caller key from a request.
///
/// Prefers the first `x-forwarded-for` entry (set by proxies), then the
/// peer address the connection was accepted from, then a fixed fallback so
/// unattributable requests share one bucket.
fn caller_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return forwarded.to_string();
    }

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

    fn request_with_header(name: &str, value: &str) -> Request {
        axum::http::Request::builder()
            .uri("/")
            .header(name, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_caller_key_from_forwarded_header() {
        let request = request_with_header("x-forwarded-for", "203.0.113.7, 10.0.0.1");
        assert_eq!(caller_key(&request), "203.0.113.7");
    }

    #[test]
    fn test_caller_key_trims_whitespace() {
        let request = request_with_header("x-forwarded-for", "  203.0.113.7  ");
        assert_eq!(caller_key(&request), "203.0.113.7");
    }

    #[test]
    fn test_caller_key_from_connect_info() {
        let mut request = axum::http::Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let addr: SocketAddr = "192.0.2.4:55000".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));

        assert_eq!(caller_key(&request), "192.0.2.4");
    }

    #[test]
    fn test_caller_key_fallback() {
        let request = axum::http::Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap();
        assert_eq!(caller_key(&request), UNKNOWN_CALLER);
    }

    #[test]
    fn test_caller_key_empty_header_falls_back() {
        let request = request_with_header("x-forwarded-for", "");
        assert_eq!(caller_key(&request), UNKNOWN_CALLER);
    }
}
