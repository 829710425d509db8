use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Badges service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum BadgesServiceError {
    #[error("invalid token")]
    InvalidToken,
    #[error("badge name must be 1-50 characters")]
    InvalidBadgeName,
    #[error("badge color must be a #rrggbb hex value")]
    InvalidBadgeColor,
    #[error("request body is not valid JSON")]
    MalformedBody,
    #[error("missing signature or timestamp")]
    MissingSignature,
    #[error("request expired")]
    StaleTimestamp,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("you already have a pending request")]
    RequestPending,
    #[error("you already have an approved badge")]
    AlreadyApproved,
    #[error("request has already been reviewed")]
    AlreadyReviewed,
    #[error("request not found")]
    RequestNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl BadgesServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidBadgeName => "INVALID_BADGE_NAME",
            Self::InvalidBadgeColor => "INVALID_BADGE_COLOR",
            Self::MalformedBody => "MALFORMED_BODY",
            Self::MissingSignature => "MISSING_SIGNATURE",
            Self::StaleTimestamp => "REQUEST_EXPIRED",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::RequestPending => "REQUEST_PENDING",
            Self::AlreadyApproved => "ALREADY_APPROVED",
            Self::AlreadyReviewed => "ALREADY_REVIEWED",
            Self::RequestNotFound => "REQUEST_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for BadgesServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidBadgeName | Self::InvalidBadgeColor | Self::MalformedBody => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidToken
            | Self::MissingSignature
            | Self::StaleTimestamp
            | Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::RequestNotFound | Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::RequestPending | Self::AlreadyApproved | Self::AlreadyReviewed => {
                StatusCode::CONFLICT
            }
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
