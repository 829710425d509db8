use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Review state of a badge request. Stored as a string column; every read
/// goes through [`RequestStatus::from_str`] so an unknown value fails loudly
/// instead of silently matching nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Denied,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "denied" => Some(Self::Denied),
            _ => None,
        }
    }
}

/// A user's badge request.
#[derive(Debug, Clone)]
pub struct BadgeRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub badge_name: String,
    pub badge_description: Option<String>,
    pub badge_color: String,
    pub badge_icon_url: Option<String>,
    pub status: RequestStatus,
    pub denial_reason: Option<String>,
    pub admin_edited_name: Option<String>,
    pub admin_edited_description: Option<String>,
    pub admin_edited_color: Option<String>,
    pub admin_edited_icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Badge definition created on approval.
#[derive(Debug, Clone)]
pub struct GlobalBadge {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon_url: Option<String>,
    pub rarity: String,
    pub is_limited: bool,
    pub max_claims: i32,
    pub claims_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Moderator edits applied on approval. `None` keeps the requested value.
#[derive(Debug, Clone, Default)]
pub struct AdminEdits {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon_url: Option<String>,
}

/// User record as seen through the auth service's internal endpoint.
#[derive(Debug, Clone)]
pub struct DirectoryUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

/// Fallback reason when the moderator denies without one.
pub const DEFAULT_DENIAL_REASON: &str = "Your request did not meet our guidelines.";
