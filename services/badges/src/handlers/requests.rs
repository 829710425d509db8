use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use uservault_auth_types::bearer::BearerToken;

use crate::domain::types::BadgeRequest;
use crate::error::BadgesServiceError;
use crate::handlers::require_session;
use crate::state::AppState;
use crate::usecase::submit::{GetMyRequestUseCase, SubmitRequestInput, SubmitRequestUseCase};

#[derive(Serialize)]
pub struct RequestResponse {
    pub id: Uuid,
    pub badge_name: String,
    pub badge_description: Option<String>,
    pub badge_color: String,
    pub badge_icon_url: Option<String>,
    pub status: &'static str,
    pub denial_reason: Option<String>,
    #[serde(serialize_with = "uservault_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "uservault_core::serde::to_rfc3339_ms_opt")]
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<BadgeRequest> for RequestResponse {
    fn from(r: BadgeRequest) -> Self {
        Self {
            id: r.id,
            badge_name: r.badge_name,
            badge_description: r.badge_description,
            badge_color: r.badge_color,
            badge_icon_url: r.badge_icon_url,
            status: r.status.as_str(),
            denial_reason: r.denial_reason,
            created_at: r.created_at,
            reviewed_at: r.reviewed_at,
        }
    }
}

// ── POST /badges/requests ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitRequestBody {
    pub badge_name: String,
    pub badge_description: Option<String>,
    pub badge_color: String,
    pub badge_icon_url: Option<String>,
}

pub async fn submit_request(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(body): Json<SubmitRequestBody>,
) -> Result<impl IntoResponse, BadgesServiceError> {
    let session = require_session(&token, &state.jwt_secret)?;

    let usecase = SubmitRequestUseCase {
        requests: state.request_repo(),
        directory: state.user_directory(),
        notifier: state.notifier(),
    };

    let request = usecase
        .execute(SubmitRequestInput {
            user_id: session.user_id,
            badge_name: body.badge_name,
            badge_description: body.badge_description,
            badge_color: body.badge_color,
            badge_icon_url: body.badge_icon_url,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RequestResponse::from(request))))
}

// ── GET /badges/requests/me ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MyRequestResponse {
    pub request: Option<RequestResponse>,
}

pub async fn my_request(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, BadgesServiceError> {
    let session = require_session(&token, &state.jwt_secret)?;

    let usecase = GetMyRequestUseCase {
        requests: state.request_repo(),
    };
    let request = usecase.execute(session.user_id).await?;

    Ok(Json(MyRequestResponse {
        request: request.map(RequestResponse::from),
    }))
}
