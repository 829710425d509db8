//! Moderation-bot endpoints. These take the raw request body because the
//! HMAC signature covers the exact bytes on the wire; deserialization only
//! happens after the signature checks out.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::AdminEdits;
use crate::domain::webhook::verify_webhook;
use crate::error::BadgesServiceError;
use crate::state::AppState;
use crate::usecase::review::{
    ApproveRequestInput, ApproveRequestUseCase, DenyRequestInput, DenyRequestUseCase,
};

fn verify(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<(), BadgesServiceError> {
    let signature = headers.get("x-signature").and_then(|v| v.to_str().ok());
    let timestamp = headers.get("x-timestamp").and_then(|v| v.to_str().ok());
    verify_webhook(
        &state.webhook_secret,
        body,
        signature,
        timestamp,
        Utc::now().timestamp(),
    )
}

// ── POST /badges/requests/{id}/approve ────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ApproveBody {
    pub edited_name: Option<String>,
    pub edited_description: Option<String>,
    pub edited_color: Option<String>,
    pub edited_icon_url: Option<String>,
}

#[derive(Serialize)]
pub struct ApproveResponse {
    pub badge_id: Uuid,
}

pub async fn approve_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, BadgesServiceError> {
    verify(&state, &headers, &body)?;

    let body: ApproveBody = if body.is_empty() {
        ApproveBody::default()
    } else {
        serde_json::from_slice(&body).map_err(|_| BadgesServiceError::MalformedBody)?
    };

    let usecase = ApproveRequestUseCase {
        requests: state.request_repo(),
        directory: state.user_directory(),
        mailer: state.mailer.clone(),
    };

    let out = usecase
        .execute(ApproveRequestInput {
            request_id,
            edits: AdminEdits {
                name: body.edited_name,
                description: body.edited_description,
                color: body.edited_color,
                icon_url: body.edited_icon_url,
            },
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApproveResponse {
            badge_id: out.badge_id,
        }),
    ))
}

// ── POST /badges/requests/{id}/deny ───────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct DenyBody {
    pub denial_reason: Option<String>,
}

pub async fn deny_request(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, BadgesServiceError> {
    verify(&state, &headers, &body)?;

    let body: DenyBody = if body.is_empty() {
        DenyBody::default()
    } else {
        serde_json::from_slice(&body).map_err(|_| BadgesServiceError::MalformedBody)?
    };

    let usecase = DenyRequestUseCase {
        requests: state.request_repo(),
        directory: state.user_directory(),
        mailer: state.mailer.clone(),
    };

    usecase
        .execute(DenyRequestInput {
            request_id,
            denial_reason: body.denial_reason,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
