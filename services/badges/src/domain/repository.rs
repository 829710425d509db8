#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{AdminEdits, BadgeRequest, DirectoryUser, GlobalBadge};
use crate::error::BadgesServiceError;

/// Repository for badge requests and the badges minted from them.
pub trait BadgeRequestRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid)
    -> Result<Option<BadgeRequest>, BadgesServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BadgeRequest>, BadgesServiceError>;

    async fn create(&self, request: &BadgeRequest) -> Result<(), BadgesServiceError>;

    /// Delete a request row. Returns `true` if deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, BadgesServiceError>;

    /// Approve a `pending` request: flip the status, record the edits and
    /// review time, mint the badge, and assign it in one transaction. Returns
    /// `false` without side effects when the request was not pending.
    async fn approve_pending(
        &self,
        id: Uuid,
        edits: &AdminEdits,
        badge: &GlobalBadge,
    ) -> Result<bool, BadgesServiceError>;

    /// Deny a `pending` request, recording the reason and review time.
    /// Returns `false` when the request was not pending.
    async fn deny_pending(&self, id: Uuid, reason: &str) -> Result<bool, BadgesServiceError>;
}

/// Lookup of account identity owned by the auth service.
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DirectoryUser>, BadgesServiceError>;
}

/// Fire-and-forget moderation-channel notification.
pub trait ModerationNotifier: Send + Sync {
    async fn notify_new_request(&self, request: &BadgeRequest, user: &DirectoryUser);
}
