use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use uservault_auth_types::{
    cookie::{
        UV_ACCESS_TOKEN, UV_REFRESH_TOKEN, clear_cookies, set_access_token_cookie,
        set_refresh_token_cookie,
    },
    token::validate_access_token,
};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginOutput, LoginUseCase};
use crate::usecase::token::RefreshTokenUseCase;

const X_UV_ACCESS_TOKEN_EXPIRES: &str = "x-uv-access-token-expires";

pub(crate) fn token_expires_headers(exp: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(X_UV_ACCESS_TOKEN_EXPIRES),
        HeaderValue::from_str(&exp.to_string()).unwrap(),
    );
    headers
}

// ── GET /auth/token ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckTokenQuery {
    /// Minimum role required, if any.
    pub role: Option<u8>,
    /// Minimum assurance level required, if any.
    pub aal: Option<u8>,
}

#[derive(Serialize)]
pub struct CheckTokenResponse {
    pub user_id: uuid::Uuid,
    pub user_role: u8,
    pub aal: u8,
    pub access_token_exp: u64,
}

pub async fn check_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CheckTokenQuery>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let token_value = jar
        .get(UV_ACCESS_TOKEN)
        .map(|c| c.value().to_owned())
        .ok_or(AuthServiceError::InvalidToken)?;

    let info = validate_access_token(&token_value, &state.jwt_secret)
        .map_err(|_| AuthServiceError::InvalidToken)?;

    if let Some(min_role) = query.role {
        if info.user_role < min_role {
            return Err(AuthServiceError::InvalidToken);
        }
    }
    if let Some(min_aal) = query.aal {
        if info.aal < min_aal {
            return Err(AuthServiceError::InvalidToken);
        }
    }

    let body = CheckTokenResponse {
        user_id: info.user_id,
        user_role: info.user_role,
        aal: info.aal,
        access_token_exp: info.exp,
    };

    Ok((StatusCode::OK, token_expires_headers(info.exp), Json(body)))
}

// ── POST /auth/token (login) ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub captcha_token: String,
}

/// Discriminated login response: either a session opened, or an MFA
/// challenge to complete with the returned short-lived token.
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginResponse {
    Ok {
        user_id: uuid::Uuid,
        user_role: u8,
    },
    MfaRequired {
        factor_id: uuid::Uuid,
        mfa_token: String,
    },
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        factors: state.factor_repo(),
        bot_verifier: state.bot_verifier(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
            bot_token: body.captcha_token,
        })
        .await?;

    match out {
        LoginOutput::Session {
            user_id,
            user_role,
            access_token,
            access_token_exp,
            refresh_token,
        } => {
            let jar = set_access_token_cookie(jar, access_token, state.cookie_domain.clone());
            let jar = set_refresh_token_cookie(jar, refresh_token, state.cookie_domain.clone());
            Ok((
                StatusCode::CREATED,
                jar,
                token_expires_headers(access_token_exp),
                Json(LoginResponse::Ok { user_id, user_role }),
            )
                .into_response())
        }
        LoginOutput::MfaRequired {
            factor_id,
            mfa_token,
        } => Ok((
            StatusCode::OK,
            Json(LoginResponse::MfaRequired {
                factor_id,
                mfa_token,
            }),
        )
            .into_response()),
    }
}

// ── PATCH /auth/token ─────────────────────────────────────────────────────────

pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let refresh_value = jar
        .get(UV_REFRESH_TOKEN)
        .map(|c| c.value().to_owned())
        .ok_or(AuthServiceError::InvalidRefreshToken)?;

    let usecase = RefreshTokenUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase.execute(&refresh_value).await?;

    let jar = set_access_token_cookie(jar, out.access_token, state.cookie_domain.clone());
    let jar = set_refresh_token_cookie(jar, out.refresh_token, state.cookie_domain.clone());

    Ok((
        StatusCode::CREATED,
        jar,
        token_expires_headers(out.access_token_exp),
    ))
}

// ── DELETE /auth/token ────────────────────────────────────────────────────────

pub async fn revoke_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let jar = clear_cookies(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
