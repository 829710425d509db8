#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{AuthUser, CodePurpose, MfaFactor, OutboxEvent, VerificationCode};
use crate::error::AuthServiceError;

/// Repository for account records.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError>;
    async fn find_by_username(&self, username: &str)
    -> Result<Option<AuthUser>, AuthServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthServiceError>;
    async fn create(&self, user: &AuthUser) -> Result<(), AuthServiceError>;
    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), AuthServiceError>;

    /// Delete the account. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError>;
}

/// Repository for one-time verification codes.
pub trait VerificationCodeRepository: Send + Sync {
    /// Insert a new code and its outbox event atomically, superseding any
    /// still-active code for the same `(email, purpose)` pair.
    async fn replace_active(
        &self,
        code: &VerificationCode,
        event: &OutboxEvent,
    ) -> Result<(), AuthServiceError>;

    /// Find a valid (unused, unexpired) code by email + purpose + code string.
    async fn find_valid(
        &self,
        email: &str,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<Option<VerificationCode>, AuthServiceError>;

    /// Mark a code as used (sets used_at = now).
    async fn mark_used(&self, id: Uuid) -> Result<(), AuthServiceError>;
}

/// Repository for TOTP factors.
pub trait MfaFactorRepository: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<MfaFactor>, AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MfaFactor>, AuthServiceError>;

    /// The user's verified factor, if any. At most one exists.
    async fn find_verified_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<MfaFactor>, AuthServiceError>;

    async fn create(&self, factor: &MfaFactor) -> Result<(), AuthServiceError>;

    async fn mark_verified(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Delete a factor. Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AuthServiceError>;

    /// Drop abandoned enrollments so a fresh one can start.
    async fn delete_unverified_by_user(&self, user_id: Uuid) -> Result<u64, AuthServiceError>;
}

/// Fixed-window rate limiter (Redis-backed in production).
pub trait RateLimiter: Send + Sync {
    /// Record a hit against `key` and report whether it stayed within
    /// `limit` hits per `window_secs`.
    async fn check(
        &self,
        key: &str,
        limit: u32,
        window_secs: u64,
    ) -> Result<bool, AuthServiceError>;
}

/// CAPTCHA / bot-detection check for unauthenticated entry points.
pub trait BotVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<bool, AuthServiceError>;
}
