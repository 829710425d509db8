use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{BadgeRequestRepository, ModerationNotifier, UserDirectory};
use crate::domain::types::{BadgeRequest, RequestStatus};
use crate::domain::validate::{validate_badge_color, validate_badge_name};
use crate::error::BadgesServiceError;

// ── SubmitRequest ────────────────────────────────────────────────────────────

pub struct SubmitRequestInput {
    pub user_id: Uuid,
    pub badge_name: String,
    pub badge_description: Option<String>,
    pub badge_color: String,
    pub badge_icon_url: Option<String>,
}

pub struct SubmitRequestUseCase<R, D, N>
where
    R: BadgeRequestRepository,
    D: UserDirectory,
    N: ModerationNotifier,
{
    pub requests: R,
    pub directory: D,
    pub notifier: N,
}

impl<R, D, N> SubmitRequestUseCase<R, D, N>
where
    R: BadgeRequestRepository,
    D: UserDirectory,
    N: ModerationNotifier,
{
    pub async fn execute(
        &self,
        input: SubmitRequestInput,
    ) -> Result<BadgeRequest, BadgesServiceError> {
        if !validate_badge_name(&input.badge_name) {
            return Err(BadgesServiceError::InvalidBadgeName);
        }
        if !validate_badge_color(&input.badge_color) {
            return Err(BadgesServiceError::InvalidBadgeColor);
        }

        // One request per user: pending blocks, approved is permanent, a
        // denied row makes way for the retry.
        if let Some(existing) = self.requests.find_by_user(input.user_id).await? {
            match existing.status {
                RequestStatus::Pending => return Err(BadgesServiceError::RequestPending),
                RequestStatus::Approved => return Err(BadgesServiceError::AlreadyApproved),
                RequestStatus::Denied => {
                    self.requests.delete(existing.id).await?;
                }
            }
        }

        let user = self
            .directory
            .find_by_id(input.user_id)
            .await?
            .ok_or(BadgesServiceError::UserNotFound)?;

        let request = BadgeRequest {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            badge_name: input.badge_name.trim().to_owned(),
            badge_description: input.badge_description,
            badge_color: input.badge_color,
            badge_icon_url: input.badge_icon_url,
            status: RequestStatus::Pending,
            denial_reason: None,
            admin_edited_name: None,
            admin_edited_description: None,
            admin_edited_color: None,
            admin_edited_icon_url: None,
            created_at: Utc::now(),
            reviewed_at: None,
        };
        self.requests.create(&request).await?;

        // Fire-and-forget; a dropped notification only delays moderation.
        self.notifier.notify_new_request(&request, &user).await;

        Ok(request)
    }
}

// ── RequestStatus (caller's own) ─────────────────────────────────────────────

pub struct GetMyRequestUseCase<R: BadgeRequestRepository> {
    pub requests: R,
}

impl<R: BadgeRequestRepository> GetMyRequestUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
    ) -> Result<Option<BadgeRequest>, BadgesServiceError> {
        self.requests.find_by_user(user_id).await
    }
}
