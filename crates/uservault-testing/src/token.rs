//! Mint tokens for tests without pulling the auth service in as a dependency.

use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use uuid::Uuid;

use uservault_auth_types::token::{AAL1, AAL2, SCOPE_MFA_PENDING, SCOPE_SESSION};

// Mirrors `uservault_auth_types::token::JwtClaims`; redeclared here because
// `Serialize` on the real struct is gated to the auth service.
#[derive(Serialize)]
struct TestClaims<'a> {
    sub: String,
    role: u8,
    aal: u8,
    scope: &'a str,
    exp: u64,
}

fn future_exp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
        + 3600
}

fn mint(user_id: Uuid, role: u8, aal: u8, scope: &str, secret: &str) -> String {
    let claims = TestClaims {
        sub: user_id.to_string(),
        role,
        aal,
        scope,
        exp: future_exp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// A valid AAL1 session access token for `user_id`.
pub fn session_token(user_id: Uuid, role: u8, secret: &str) -> String {
    mint(user_id, role, AAL1, SCOPE_SESSION, secret)
}

/// A valid AAL2 (MFA-completed) session access token for `user_id`.
pub fn session_token_aal2(user_id: Uuid, role: u8, secret: &str) -> String {
    mint(user_id, role, AAL2, SCOPE_SESSION, secret)
}

/// A valid MFA-pending token for `user_id`.
pub fn mfa_pending_token(user_id: Uuid, role: u8, secret: &str) -> String {
    mint(user_id, role, AAL1, SCOPE_MFA_PENDING, secret)
}
