use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use uservault_auth::domain::password::hash_password;
use uservault_auth::domain::repository::{
    BotVerifier, MfaFactorRepository, RateLimiter, UserRepository, VerificationCodeRepository,
};
use uservault_auth::domain::types::{
    AuthUser, CodePurpose, MfaFactor, OutboxEvent, VerificationCode,
};
use uservault_auth::error::AuthServiceError;

pub use uservault_testing::TEST_JWT_SECRET;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<AuthUser>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<AuthUser>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AuthUser>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn create(&self, user: &AuthUser) -> Result<(), AuthServiceError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.password_hash = hash.to_owned();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

// ── MockCodeRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockCodeRepo {
    pub codes: Arc<Mutex<Vec<VerificationCode>>>,
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl MockCodeRepo {
    pub fn new(codes: Vec<VerificationCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
            events: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

impl VerificationCodeRepository for MockCodeRepo {
    async fn replace_active(
        &self,
        code: &VerificationCode,
        event: &OutboxEvent,
    ) -> Result<(), AuthServiceError> {
        let mut codes = self.codes.lock().unwrap();
        let now = Utc::now();
        for c in codes
            .iter_mut()
            .filter(|c| c.email == code.email && c.purpose == code.purpose && c.used_at.is_none())
        {
            c.used_at = Some(now);
        }
        codes.push(code.clone());
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_valid(
        &self,
        email: &str,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<Option<VerificationCode>, AuthServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.email == email && c.purpose == purpose && c.code == code && c.is_valid())
            .cloned())
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), AuthServiceError> {
        let mut codes = self.codes.lock().unwrap();
        if let Some(c) = codes.iter_mut().find(|c| c.id == id) {
            c.used_at = Some(Utc::now());
        }
        Ok(())
    }
}

// ── MockFactorRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockFactorRepo {
    pub factors: Arc<Mutex<Vec<MfaFactor>>>,
}

impl MockFactorRepo {
    pub fn new(factors: Vec<MfaFactor>) -> Self {
        Self {
            factors: Arc::new(Mutex::new(factors)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

impl MfaFactorRepository for MockFactorRepo {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<MfaFactor>, AuthServiceError> {
        Ok(self
            .factors
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MfaFactor>, AuthServiceError> {
        Ok(self
            .factors
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    async fn find_verified_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<MfaFactor>, AuthServiceError> {
        Ok(self
            .factors
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.user_id == user_id && f.is_verified())
            .cloned())
    }

    async fn create(&self, factor: &MfaFactor) -> Result<(), AuthServiceError> {
        self.factors.lock().unwrap().push(factor.clone());
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), AuthServiceError> {
        let mut factors = self.factors.lock().unwrap();
        if let Some(f) = factors.iter_mut().find(|f| f.id == id) {
            f.verified_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AuthServiceError> {
        let mut factors = self.factors.lock().unwrap();
        let before = factors.len();
        factors.retain(|f| !(f.id == id && f.user_id == user_id));
        Ok(factors.len() < before)
    }

    async fn delete_unverified_by_user(&self, user_id: Uuid) -> Result<u64, AuthServiceError> {
        let mut factors = self.factors.lock().unwrap();
        let before = factors.len();
        factors.retain(|f| !(f.user_id == user_id && !f.is_verified()));
        Ok((before - factors.len()) as u64)
    }
}

// ── MockRateLimiter ──────────────────────────────────────────────────────────

/// In-memory fixed window: counts never expire, which is fine for a test
/// that runs in milliseconds.
#[derive(Clone, Default)]
pub struct MockRateLimiter {
    pub hits: Arc<Mutex<HashMap<String, u32>>>,
}

impl MockRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimiter for MockRateLimiter {
    async fn check(
        &self,
        key: &str,
        limit: u32,
        _window_secs: u64,
    ) -> Result<bool, AuthServiceError> {
        let mut hits = self.hits.lock().unwrap();
        let count = hits.entry(key.to_owned()).or_insert(0);
        *count += 1;
        Ok(*count <= limit)
    }
}

// ── MockBotVerifier ──────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub struct MockBotVerifier {
    pub ok: bool,
}

impl BotVerifier for MockBotVerifier {
    async fn verify(&self, _token: &str) -> Result<bool, AuthServiceError> {
        Ok(self.ok)
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_user() -> AuthUser {
    AuthUser {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        email: "user@example.com".to_owned(),
        username: "user".to_owned(),
        password_hash: String::new(),
        role: 0,
        banned: false,
        created_at: Utc::now(),
    }
}

pub fn test_user_with_password(password: &str) -> AuthUser {
    let mut user = test_user();
    user.password_hash = hash_password(password).unwrap();
    user
}

pub fn test_code(email: &str, purpose: CodePurpose) -> VerificationCode {
    VerificationCode {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        code: "123456".to_owned(),
        purpose,
        expires_at: Utc::now() + chrono::Duration::seconds(300),
        used_at: None,
        created_at: Utc::now(),
    }
}

pub fn test_factor(user_id: Uuid, verified: bool) -> MfaFactor {
    MfaFactor {
        id: Uuid::new_v4(),
        user_id,
        secret: vec![7u8; 20],
        verified_at: verified.then(Utc::now),
        created_at: Utc::now(),
    }
}
