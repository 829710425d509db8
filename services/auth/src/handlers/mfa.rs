use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use uservault_auth_types::bearer::BearerToken;
use uservault_auth_types::cookie::{set_access_token_cookie, set_refresh_token_cookie};

use crate::error::AuthServiceError;
use crate::handlers::token::token_expires_headers;
use crate::handlers::{client_ip, require_session};
use crate::state::AppState;
use crate::usecase::mfa::{
    ChallengeMethod, CompleteMfaChallengeInput, CompleteMfaChallengeUseCase, EnrollMfaUseCase,
    ListMfaFactorsUseCase, SendMfaEmailUseCase, UnenrollMfaUseCase, VerifyEnrollmentInput,
    VerifyEnrollmentUseCase,
};

// ── POST /auth/mfa/factors ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EnrollResponse {
    pub factor_id: Uuid,
    pub secret: String,
    pub otpauth_uri: String,
}

pub async fn enroll_factor(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, AuthServiceError> {
    let session = require_session(&token, &state.jwt_secret)?;

    let usecase = EnrollMfaUseCase {
        users: state.user_repo(),
        factors: state.factor_repo(),
    };
    let out = usecase.execute(session.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollResponse {
            factor_id: out.factor_id,
            secret: out.secret,
            otpauth_uri: out.otpauth_uri,
        }),
    ))
}

// ── POST /auth/mfa/factors/{id}/verify ────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyFactorRequest {
    pub code: String,
}

pub async fn verify_factor(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(factor_id): Path<Uuid>,
    Json(body): Json<VerifyFactorRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let session = require_session(&token, &state.jwt_secret)?;

    if !crate::domain::totp::is_six_digits(&body.code) {
        return Err(AuthServiceError::InvalidCodeFormat);
    }

    let usecase = VerifyEnrollmentUseCase {
        factors: state.factor_repo(),
    };
    usecase
        .execute(VerifyEnrollmentInput {
            user_id: session.user_id,
            factor_id,
            code: body.code,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /auth/mfa/factors/{id} ─────────────────────────────────────────────

pub async fn delete_factor(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(factor_id): Path<Uuid>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let session = require_session(&token, &state.jwt_secret)?;

    let usecase = UnenrollMfaUseCase {
        factors: state.factor_repo(),
    };
    usecase.execute(session.user_id, factor_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ── GET /auth/mfa/factors ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FactorResponse {
    pub id: Uuid,
    pub verified: bool,
    #[serde(serialize_with = "uservault_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_factors(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, AuthServiceError> {
    let session = require_session(&token, &state.jwt_secret)?;

    let usecase = ListMfaFactorsUseCase {
        factors: state.factor_repo(),
    };
    let factors = usecase.execute(session.user_id).await?;

    let body: Vec<FactorResponse> = factors
        .into_iter()
        .map(|f| FactorResponse {
            id: f.id,
            verified: f.verified,
            created_at: f.created_at,
        })
        .collect();

    Ok(Json(body))
}

// ── POST /auth/mfa/email ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SendMfaEmailResponse {
    pub masked_email: String,
}

pub async fn send_mfa_email(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = SendMfaEmailUseCase {
        users: state.user_repo(),
        codes: state.code_repo(),
        rate_limiter: state.rate_limiter(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase.execute(&token, client_ip(&headers)).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SendMfaEmailResponse {
            masked_email: out.masked_email,
        }),
    ))
}

// ── POST /auth/mfa/challenge ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeMethodBody {
    Totp,
    Email,
}

#[derive(Deserialize)]
pub struct ChallengeRequest {
    pub method: ChallengeMethodBody,
    pub code: String,
}

#[derive(Serialize)]
pub struct ChallengeResponse {
    pub user_id: Uuid,
    pub user_role: u8,
}

pub async fn complete_challenge(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    jar: CookieJar,
    Json(body): Json<ChallengeRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = CompleteMfaChallengeUseCase {
        users: state.user_repo(),
        factors: state.factor_repo(),
        codes: state.code_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase
        .execute(CompleteMfaChallengeInput {
            mfa_token: token,
            method: match body.method {
                ChallengeMethodBody::Totp => ChallengeMethod::Totp,
                ChallengeMethodBody::Email => ChallengeMethod::Email,
            },
            code: body.code,
        })
        .await?;

    let jar = set_access_token_cookie(jar, out.access_token, state.cookie_domain.clone());
    let jar = set_refresh_token_cookie(jar, out.refresh_token, state.cookie_domain.clone());

    Ok((
        StatusCode::CREATED,
        jar,
        token_expires_headers(out.access_token_exp),
        Json(ChallengeResponse {
            user_id: out.user_id,
            user_role: out.user_role,
        }),
    ))
}
