use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account record as the auth service sees it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: u8,
    pub banned: bool,
    pub created_at: DateTime<Utc>,
}

/// What a one-time code is good for. Each purpose has its own TTL and the
/// "most recent code wins" rule applies per `(email, purpose)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    Signup,
    PasswordReset,
    MfaEmail,
    AccountDeletion,
}

impl CodePurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::PasswordReset => "password_reset",
            Self::MfaEmail => "mfa_email",
            Self::AccountDeletion => "account_deletion",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "signup" => Some(Self::Signup),
            "password_reset" => Some(Self::PasswordReset),
            "mfa_email" => Some(Self::MfaEmail),
            "account_deletion" => Some(Self::AccountDeletion),
            _ => None,
        }
    }

    /// Code lifetime. Reset links ride in email and get a longer window;
    /// the others are typed in promptly or not at all.
    pub fn ttl_secs(self) -> i64 {
        match self {
            Self::Signup => 900,
            Self::PasswordReset => 3600,
            Self::MfaEmail => 600,
            Self::AccountDeletion => 900,
        }
    }
}

/// One-time 6-digit verification code.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub purpose: CodePurpose,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl VerificationCode {
    pub fn is_valid(&self) -> bool {
        self.used_at.is_none() && self.expires_at > Utc::now()
    }
}

/// Enrolled TOTP factor. Unverified until the owner proves possession of
/// the secret; only verified factors count toward login challenges.
#[derive(Debug, Clone)]
pub struct MfaFactor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub secret: Vec<u8>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl MfaFactor {
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }
}

/// Outbox event for async delivery (verification-code emails).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Verification codes are always 6 digits.
pub const CODE_LEN: usize = 6;

/// TOTP secret length in bytes (160 bits, RFC 4226 recommendation).
pub const TOTP_SECRET_LEN: usize = 20;

/// Code-generation rate limits (fixed one-hour window).
pub const MAX_CODES_PER_EMAIL: u32 = 5;
pub const MAX_CODES_PER_IP: u32 = 10;
pub const CODE_RATE_WINDOW_SECS: u64 = 3600;

/// Email-OTP sends per user per five-minute window during an MFA challenge.
pub const MAX_MFA_EMAILS_PER_USER: u32 = 3;
pub const MFA_EMAIL_RATE_WINDOW_SECS: u64 = 300;
