//! JWT validation for access, refresh, and MFA-pending tokens.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// Token scope: a full session token, or the short-lived token handed out
/// after a correct password when an MFA challenge is still outstanding.
pub const SCOPE_SESSION: &str = "session";
pub const SCOPE_MFA_PENDING: &str = "mfa_pending";

/// Password-only authentication.
pub const AAL1: u8 = 1;
/// Password plus a second factor.
pub const AAL2: u8 = 2;

/// User identity extracted from a validated token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub user_role: u8,
    /// Authenticator assurance level the session was established at.
    pub aal: u8,
    pub exp: u64,
}

/// Errors returned by the validation functions.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("wrong token scope")]
    WrongScope,
}

/// JWT claims payload shared by token creation (auth service) and validation
/// (every service that accepts bearer tokens).
///
/// [`Deserialize`] is always available: all consumers validate tokens.
/// [`Serialize`] requires the **`USE_ONLY_IN_AUTH_SERVICE`** cargo feature.
/// Only the auth service enables it because it is the sole token issuer.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct JwtClaims {
    /// User ID (UUID string).
    pub sub: String,
    /// User role as `u8` wire value (0 = user, 1 = admin).
    pub role: u8,
    /// Authenticator assurance level (1 = password, 2 = password + MFA).
    pub aal: u8,
    /// Token scope, see [`SCOPE_SESSION`] / [`SCOPE_MFA_PENDING`].
    pub scope: String,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

// ── Core decode (private) ────────────────────────────────────────────────

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s to tolerate clock skew between services.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_) => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

fn token_info(claims: JwtClaims) -> Result<TokenInfo, AuthError> {
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        user_role: claims.role,
        aal: claims.aal,
        exp: claims.exp,
    })
}

// ── Public: all consumers ────────────────────────────────────────────────

/// Validate a session access token (cookie value or bearer string).
///
/// Rejects MFA-pending tokens; those are only good for completing the
/// challenge at the auth service, never for resource access.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    if claims.scope != SCOPE_SESSION {
        return Err(AuthError::WrongScope);
    }
    token_info(claims)
}

// ── Feature-gated: auth service only ─────────────────────────────────────

/// Validate an MFA-pending token. Used by the auth service's challenge flow.
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
pub fn validate_mfa_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    if claims.scope != SCOPE_MFA_PENDING {
        return Err(AuthError::WrongScope);
    }
    token_info(claims)
}

/// Validate a token of either scope and return raw JWT claims.
///
/// Used by the auth service's refresh flow: validates the refresh token,
/// then looks up the user from the `sub` claim to issue new tokens.
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
pub fn validate_token(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    decode_jwt(token, secret)
}
