use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid email or password")]
    InvalidCredential,
    #[error("account banned")]
    AccountBanned,
    #[error("bot verification failed")]
    BotCheckFailed,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("invalid username")]
    InvalidUsername,
    #[error("{0}")]
    WeakPassword(&'static str),
    #[error("invalid code format")]
    InvalidCodeFormat,
    #[error("invalid or expired code")]
    InvalidCode,
    #[error("email already registered")]
    EmailTaken,
    #[error("username already taken")]
    UsernameTaken,
    #[error("user not found")]
    UserNotFound,
    #[error("factor not found")]
    FactorNotFound,
    #[error("a verified factor is already enrolled")]
    MfaAlreadyEnrolled,
    #[error("multi-factor verification failed")]
    MfaFailed,
    #[error("too many requests")]
    RateLimited,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::AccountBanned => "ACCOUNT_BANNED",
            Self::BotCheckFailed => "BOT_CHECK_FAILED",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::InvalidCodeFormat => "INVALID_CODE_FORMAT",
            Self::InvalidCode => "INVALID_CODE",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::FactorNotFound => "FACTOR_NOT_FOUND",
            Self::MfaAlreadyEnrolled => "MFA_ALREADY_ENROLLED",
            Self::MfaFailed => "MFA_FAILED",
            Self::RateLimited => "RATE_LIMITED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidEmail
            | Self::InvalidUsername
            | Self::WeakPassword(_)
            | Self::InvalidCodeFormat => StatusCode::BAD_REQUEST,
            Self::InvalidCredential
            | Self::InvalidCode
            | Self::MfaFailed
            | Self::InvalidToken
            | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            Self::AccountBanned | Self::BotCheckFailed => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::FactorNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken | Self::UsernameTaken | Self::MfaAlreadyEnrolled => {
                StatusCode::CONFLICT
            }
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only; tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
