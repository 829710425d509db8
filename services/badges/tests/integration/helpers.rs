use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use uservault_badges::domain::repository::{
    BadgeRequestRepository, ModerationNotifier, UserDirectory,
};
use uservault_badges::domain::types::{
    AdminEdits, BadgeRequest, DirectoryUser, GlobalBadge, RequestStatus,
};
use uservault_badges::error::BadgesServiceError;
use uservault_mailer::{EmailMessage, Mailer};

pub use uservault_testing::TEST_JWT_SECRET;

// ── MockRequestRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockRequestRepo {
    pub requests: Arc<Mutex<Vec<BadgeRequest>>>,
    /// Badges minted by `approve_pending`.
    pub badges: Arc<Mutex<Vec<GlobalBadge>>>,
}

impl MockRequestRepo {
    pub fn new(requests: Vec<BadgeRequest>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(requests)),
            badges: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

impl BadgeRequestRepository for MockRequestRepo {
    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<BadgeRequest>, BadgesServiceError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BadgeRequest>, BadgesServiceError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn create(&self, request: &BadgeRequest) -> Result<(), BadgesServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BadgesServiceError> {
        let mut requests = self.requests.lock().unwrap();
        let before = requests.len();
        requests.retain(|r| r.id != id);
        Ok(requests.len() < before)
    }

    async fn approve_pending(
        &self,
        id: Uuid,
        edits: &AdminEdits,
        badge: &GlobalBadge,
    ) -> Result<bool, BadgesServiceError> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests
            .iter_mut()
            .find(|r| r.id == id && r.status == RequestStatus::Pending)
        else {
            return Ok(false);
        };
        request.status = RequestStatus::Approved;
        request.admin_edited_name = edits.name.clone();
        request.admin_edited_description = edits.description.clone();
        request.admin_edited_color = edits.color.clone();
        request.admin_edited_icon_url = edits.icon_url.clone();
        request.reviewed_at = Some(Utc::now());
        self.badges.lock().unwrap().push(badge.clone());
        Ok(true)
    }

    async fn deny_pending(&self, id: Uuid, reason: &str) -> Result<bool, BadgesServiceError> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests
            .iter_mut()
            .find(|r| r.id == id && r.status == RequestStatus::Pending)
        else {
            return Ok(false);
        };
        request.status = RequestStatus::Denied;
        request.denial_reason = Some(reason.to_owned());
        request.reviewed_at = Some(Utc::now());
        Ok(true)
    }
}

// ── MockDirectory ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockDirectory {
    pub users: Vec<DirectoryUser>,
}

impl MockDirectory {
    pub fn new(users: Vec<DirectoryUser>) -> Self {
        Self { users }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

impl UserDirectory for MockDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DirectoryUser>, BadgesServiceError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
}

// ── MockNotifier ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockNotifier {
    pub notified: Arc<Mutex<Vec<Uuid>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModerationNotifier for MockNotifier {
    async fn notify_new_request(&self, request: &BadgeRequest, _user: &DirectoryUser) {
        self.notified.lock().unwrap().push(request.id);
    }
}

// ── Mailers ──────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Mailer for MockMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Mailer whose every send fails; review outcomes must survive it.
#[derive(Clone, Copy)]
pub struct FailingMailer;

impl Mailer for FailingMailer {
    async fn send(&self, _message: &EmailMessage) -> anyhow::Result<()> {
        anyhow::bail!("smtp relay unreachable")
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_directory_user(id: Uuid) -> DirectoryUser {
    DirectoryUser {
        id,
        email: "user@example.com".to_owned(),
        username: "user".to_owned(),
    }
}

pub fn test_request(user_id: Uuid, status: RequestStatus) -> BadgeRequest {
    BadgeRequest {
        id: Uuid::new_v4(),
        user_id,
        badge_name: "Early Adopter".to_owned(),
        badge_description: Some("Joined in the first month".to_owned()),
        badge_color: "#8b5cf6".to_owned(),
        badge_icon_url: None,
        status,
        denial_reason: None,
        admin_edited_name: None,
        admin_edited_description: None,
        admin_edited_color: None,
        admin_edited_icon_url: None,
        created_at: Utc::now(),
        reviewed_at: None,
    }
}
