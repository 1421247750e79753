//! Admin authorization and credential hashing.
//!
//! Admin routes require the configured token, compared in constant time.

mod password;

pub use password::{hash_password, verify_password};

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header name for the admin token.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware guarding the admin routes.
pub async fn admin_auth_layer(
    expected_token: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    if is_admin(request.headers(), expected_token.as_deref()) {
        return next.run(request).await;
    }

    let message = if provided_token(request.headers()).is_some() {
        "Invalid admin token"
    } else {
        "Missing admin token"
    };
    tracing::warn!(
        "Rejected admin request {} {}: {}",
        request.method(),
        request.uri().path(),
        message
    );
    AppError::Unauthorized(message.to_string()).into_response()
}

/// Whether the request carries admin credentials.
/// Without a configured token every request counts as admin (dev mode).
pub fn is_admin(headers: &HeaderMap, expected_token: Option<&str>) -> bool {
    let Some(expected) = expected_token else {
        return true;
    };

    provided_token(headers)
        .map(|provided| constant_time_compare(provided, expected))
        .unwrap_or(false)
}

/// Token from `x-api-key`, else from `Authorization: Bearer`.
fn provided_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
        assert!(!constant_time_compare("short", "much-longer-key"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_no_token_configured_is_open() {
        assert!(is_admin(&HeaderMap::new(), None));
    }

    #[test]
    fn test_api_key_header() {
        assert!(is_admin(&headers(API_KEY_HEADER, "secret"), Some("secret")));
        assert!(!is_admin(&headers(API_KEY_HEADER, "wrong"), Some("secret")));
        assert!(!is_admin(&HeaderMap::new(), Some("secret")));
    }

    #[test]
    fn test_bearer_token() {
        assert!(is_admin(
            &headers("authorization", "Bearer secret"),
            Some("secret")
        ));
        assert!(!is_admin(
            &headers("authorization", "Basic secret"),
            Some("secret")
        ));
    }
}
