use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use uservault_auth_types::bearer::BearerToken;
use uservault_auth_types::cookie::clear_cookies;

use crate::error::AuthServiceError;
use crate::handlers::{client_ip, require_session};
use crate::state::AppState;
use crate::usecase::account::{DeleteAccountUseCase, RequestDeletionCodeUseCase};

// ── POST /auth/account/deletion/code ──────────────────────────────────────────

pub async fn request_deletion_code(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthServiceError> {
    let session = require_session(&token, &state.jwt_secret)?;

    let usecase = RequestDeletionCodeUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        rate_limiter: state.rate_limiter(),
    };
    usecase.execute(session.user_id, client_ip(&headers)).await?;

    Ok(StatusCode::ACCEPTED)
}

// ── DELETE /auth/account ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DeleteAccountRequest {
    pub code: String,
}

pub async fn delete_account(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    jar: CookieJar,
    Json(body): Json<DeleteAccountRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let session = require_session(&token, &state.jwt_secret)?;

    let usecase = DeleteAccountUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
    };
    usecase.execute(session.user_id, body.code).await?;

    // The session dies with the account.
    let jar = clear_cookies(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
