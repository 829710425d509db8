use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use uservault_auth_types::cookie::{set_access_token_cookie, set_refresh_token_cookie};

use crate::error::AuthServiceError;
use crate::handlers::client_ip;
use crate::handlers::token::token_expires_headers;
use crate::state::AppState;
use crate::usecase::signup::{
    CompleteSignupInput, CompleteSignupUseCase, StartSignupInput, StartSignupUseCase,
};

// ── POST /auth/signup/code ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct StartSignupRequest {
    pub email: String,
    pub captcha_token: String,
}

pub async fn start_signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<StartSignupRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = StartSignupUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        rate_limiter: state.rate_limiter(),
        bot_verifier: state.bot_verifier(),
    };

    usecase
        .execute(StartSignupInput {
            email: body.email,
            bot_token: body.captcha_token,
            client_ip: client_ip(&headers),
        })
        .await?;

    Ok(StatusCode::ACCEPTED)
}

// ── POST /auth/signup ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CompleteSignupRequest {
    pub email: String,
    pub code: String,
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct CompleteSignupResponse {
    pub user_id: uuid::Uuid,
    pub username: String,
}

pub async fn complete_signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CompleteSignupRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = CompleteSignupUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase
        .execute(CompleteSignupInput {
            email: body.email,
            code: body.code,
            username: body.username,
            password: body.password,
        })
        .await?;

    let jar = set_access_token_cookie(jar, out.access_token, state.cookie_domain.clone());
    let jar = set_refresh_token_cookie(jar, out.refresh_token, state.cookie_domain.clone());

    let response = CompleteSignupResponse {
        user_id: out.user.id,
        username: out.user.username,
    };

    Ok((
        StatusCode::CREATED,
        jar,
        token_expires_headers(out.access_token_exp),
        Json(response),
    ))
}
