use chrono::Utc;
use uuid::Uuid;

use uservault_mailer::{EmailMessage, Mailer};

use crate::domain::repository::{BadgeRequestRepository, UserDirectory};
use crate::domain::types::{AdminEdits, DEFAULT_DENIAL_REASON, GlobalBadge, RequestStatus};
use crate::error::BadgesServiceError;

// ── ApproveRequest ───────────────────────────────────────────────────────────

pub struct ApproveRequestInput {
    pub request_id: Uuid,
    pub edits: AdminEdits,
}

#[derive(Debug)]
pub struct ApproveRequestOutput {
    pub badge_id: Uuid,
}

pub struct ApproveRequestUseCase<R, D, M>
where
    R: BadgeRequestRepository,
    D: UserDirectory,
    M: Mailer,
{
    pub requests: R,
    pub directory: D,
    pub mailer: M,
}

impl<R, D, M> ApproveRequestUseCase<R, D, M>
where
    R: BadgeRequestRepository,
    D: UserDirectory,
    M: Mailer,
{
    pub async fn execute(
        &self,
        input: ApproveRequestInput,
    ) -> Result<ApproveRequestOutput, BadgesServiceError> {
        let request = self
            .requests
            .find_by_id(input.request_id)
            .await?
            .ok_or(BadgesServiceError::RequestNotFound)?;

        if request.status != RequestStatus::Pending {
            return Err(BadgesServiceError::AlreadyReviewed);
        }

        // Moderator edits win over the requested values.
        let name = input
            .edits
            .name
            .clone()
            .unwrap_or_else(|| request.badge_name.clone());
        let description = input
            .edits
            .description
            .clone()
            .or_else(|| request.badge_description.clone());
        let color = input
            .edits
            .color
            .clone()
            .unwrap_or_else(|| request.badge_color.clone());
        let icon_url = input
            .edits
            .icon_url
            .clone()
            .or_else(|| request.badge_icon_url.clone());

        let badge = GlobalBadge {
            id: Uuid::new_v4(),
            name: name.clone(),
            description,
            color: color.clone(),
            icon_url,
            rarity: "common".to_owned(),
            is_limited: true,
            max_claims: 1,
            claims_count: 0,
            created_at: Utc::now(),
        };

        // The status check above is advisory; the guarded transition is what
        // makes a concurrent double-approve mint exactly one badge.
        let approved = self
            .requests
            .approve_pending(request.id, &input.edits, &badge)
            .await?;
        if !approved {
            return Err(BadgesServiceError::AlreadyReviewed);
        }

        // Review is committed; a failed email must not undo it.
        if let Some(user) = self.directory.find_by_id(request.user_id).await? {
            let message = approval_email(&user.email, &name, &color);
            if let Err(e) = self.mailer.send(&message).await {
                tracing::warn!(request_id = %request.id, error = %e, "approval email failed");
            }
        }

        Ok(ApproveRequestOutput { badge_id: badge.id })
    }
}

// ── DenyRequest ──────────────────────────────────────────────────────────────

pub struct DenyRequestInput {
    pub request_id: Uuid,
    pub denial_reason: Option<String>,
}

pub struct DenyRequestUseCase<R, D, M>
where
    R: BadgeRequestRepository,
    D: UserDirectory,
    M: Mailer,
{
    pub requests: R,
    pub directory: D,
    pub mailer: M,
}

impl<R, D, M> DenyRequestUseCase<R, D, M>
where
    R: BadgeRequestRepository,
    D: UserDirectory,
    M: Mailer,
{
    pub async fn execute(&self, input: DenyRequestInput) -> Result<(), BadgesServiceError> {
        let request = self
            .requests
            .find_by_id(input.request_id)
            .await?
            .ok_or(BadgesServiceError::RequestNotFound)?;

        if request.status != RequestStatus::Pending {
            return Err(BadgesServiceError::AlreadyReviewed);
        }

        let reason = input
            .denial_reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DENIAL_REASON.to_owned());

        let denied = self.requests.deny_pending(request.id, &reason).await?;
        if !denied {
            return Err(BadgesServiceError::AlreadyReviewed);
        }

        if let Some(user) = self.directory.find_by_id(request.user_id).await? {
            let message = denial_email(&user.email, &request.badge_name, &reason);
            if let Err(e) = self.mailer.send(&message).await {
                tracing::warn!(request_id = %request.id, error = %e, "denial email failed");
            }
        }

        Ok(())
    }
}

fn approval_email(to: &str, badge_name: &str, color: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_owned(),
        subject: "Your badge request has been approved".to_owned(),
        html: format!(
            "<p>Your custom badge <strong style=\"color: {color}\">{badge_name}</strong> \
             has been approved and added to your profile.</p>"
        ),
    }
}

fn denial_email(to: &str, badge_name: &str, reason: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_owned(),
        subject: "Badge request update".to_owned(),
        html: format!(
            "<p>Unfortunately, your badge request for <strong>{badge_name}</strong> \
             was not approved.</p><p>Reason: {reason}</p>\
             <p>You can submit a new request with different details.</p>"
        ),
    }
}
