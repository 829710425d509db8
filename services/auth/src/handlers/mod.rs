pub mod account;
pub mod internal;
pub mod mfa;
pub mod password;
pub mod signup;
pub mod token;

use axum::http::HeaderMap;

use uservault_auth_types::token::{TokenInfo, validate_access_token};

use crate::error::AuthServiceError;

/// Best-effort client IP for rate limiting: trust the CDN header first,
/// then the proxy chain. "unknown" buckets everything without either.
pub(crate) fn client_ip(headers: &HeaderMap) -> String {
    if let Some(ip) = headers.get("cf-connecting-ip").and_then(|v| v.to_str().ok()) {
        return ip.trim().to_owned();
    }
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_owned();
            }
        }
    }
    "unknown".to_owned()
}

/// Validate the bearer access token on an authenticated endpoint.
pub(crate) fn require_session(token: &str, secret: &str) -> Result<TokenInfo, AuthServiceError> {
    validate_access_token(token, secret).map_err(|_| AuthServiceError::InvalidToken)
}
