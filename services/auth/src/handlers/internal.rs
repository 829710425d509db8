//! Service-to-service endpoints, guarded by a shared token header instead
//! of user credentials. Only other UserVault services call these.

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use uuid::Uuid;

use crate::error::AuthServiceError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

const X_INTERNAL_TOKEN: &str = "x-internal-token";

/// Constant-time comparison of the shared secret, same scheme as the
/// webhook signature check in the badges service.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let keyed = |value: &str| {
        let mut mac =
            HmacSha256::new_from_slice(expected.as_bytes()).expect("HMAC accepts any key length");
        mac.update(value.as_bytes());
        mac
    };
    let tag = keyed(presented).finalize().into_bytes();
    keyed(expected).verify_slice(&tag).is_ok()
}

fn require_internal(headers: &HeaderMap, expected: &str) -> Result<(), AuthServiceError> {
    let presented = headers
        .get(X_INTERNAL_TOKEN)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthServiceError::InvalidToken)?;
    if !tokens_match(presented, expected) {
        return Err(AuthServiceError::InvalidToken);
    }
    Ok(())
}

// ── GET /internal/users/{user_id} ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct InternalUserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: u8,
    pub banned: bool,
}

pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AuthServiceError> {
    require_internal(&headers, &state.internal_token)?;

    use crate::domain::repository::UserRepository as _;
    let user = state
        .user_repo()
        .find_by_id(user_id)
        .await?
        .ok_or(AuthServiceError::UserNotFound)?;

    Ok(Json(InternalUserResponse {
        id: user.id,
        email: user.email,
        username: user.username,
        role: user.role,
        banned: user.banned,
    }))
}
