use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::error::AuthServiceError;
use crate::handlers::client_ip;
use crate::state::AppState;
use crate::usecase::password_reset::{
    CompletePasswordResetInput, CompletePasswordResetUseCase, StartPasswordResetInput,
    StartPasswordResetUseCase,
};

// ── POST /auth/password/code ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct StartResetRequest {
    pub email: String,
    pub captcha_token: String,
}

pub async fn start_password_reset(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<StartResetRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = StartPasswordResetUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        rate_limiter: state.rate_limiter(),
        bot_verifier: state.bot_verifier(),
    };

    usecase
        .execute(StartPasswordResetInput {
            email: body.email,
            bot_token: body.captcha_token,
            client_ip: client_ip(&headers),
        })
        .await?;

    // Same answer whether or not the account exists.
    Ok(StatusCode::ACCEPTED)
}

// ── POST /auth/password/reset ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CompleteResetRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub async fn complete_password_reset(
    State(state): State<AppState>,
    Json(body): Json<CompleteResetRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = CompletePasswordResetUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
    };

    usecase
        .execute(CompletePasswordResetInput {
            email: body.email,
            code: body.code,
            new_password: body.new_password,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
