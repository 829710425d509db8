use chrono::{Duration, Utc};
use rand::RngExt;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{RateLimiter, VerificationCodeRepository};
use crate::domain::types::{
    CODE_LEN, CODE_RATE_WINDOW_SECS, CodePurpose, MAX_CODES_PER_EMAIL, MAX_CODES_PER_IP,
    OutboxEvent, VerificationCode,
};
use crate::error::AuthServiceError;

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

pub struct GenerateCodeInput {
    /// Already normalized by the caller.
    pub email: String,
    pub purpose: CodePurpose,
    pub client_ip: String,
}

/// Issue a fresh code for `(email, purpose)`, superseding any active one,
/// and queue the email through the outbox. Free function so the signup and
/// reset flows can call it with borrowed repositories.
pub async fn generate_verification_code<C, R>(
    codes: &C,
    rate_limiter: &R,
    input: GenerateCodeInput,
) -> Result<(), AuthServiceError>
where
    C: VerificationCodeRepository,
    R: RateLimiter,
{
    // Per-email then per-IP fixed windows. Both hits are recorded even when
    // the second check fails; the windows are short enough that overcounting
    // a blocked request does not matter.
    let email_key = format!("codes:email:{}", input.email);
    if !rate_limiter
        .check(&email_key, MAX_CODES_PER_EMAIL, CODE_RATE_WINDOW_SECS)
        .await?
    {
        return Err(AuthServiceError::RateLimited);
    }
    let ip_key = format!("codes:ip:{}", input.client_ip);
    if !rate_limiter
        .check(&ip_key, MAX_CODES_PER_IP, CODE_RATE_WINDOW_SECS)
        .await?
    {
        return Err(AuthServiceError::RateLimited);
    }

    let code_str = generate_code();
    let now = Utc::now();
    let code = VerificationCode {
        id: Uuid::new_v4(),
        email: input.email.clone(),
        code: code_str.clone(),
        purpose: input.purpose,
        expires_at: now + Duration::seconds(input.purpose.ttl_secs()),
        used_at: None,
        created_at: now,
    };

    let event = OutboxEvent {
        id: Uuid::new_v4(),
        kind: "verification_code_created".to_owned(),
        payload: json!({
            "email": input.email,
            "code": code_str,
            "purpose": input.purpose.as_str(),
        }),
        idempotency_key: format!("verification_code_created:{}", code.id),
    };

    codes.replace_active(&code, &event).await
}

pub struct VerifyCodeInput {
    pub email: String,
    pub purpose: CodePurpose,
    pub code: String,
}

/// Consume a code. Wrong, expired, used, and superseded codes all come back
/// as the same [`AuthServiceError::InvalidCode`] so the response never leaks
/// which one it was.
pub async fn consume_verification_code<C: VerificationCodeRepository>(
    codes: &C,
    input: VerifyCodeInput,
) -> Result<(), AuthServiceError> {
    if !crate::domain::totp::is_six_digits(&input.code) {
        return Err(AuthServiceError::InvalidCodeFormat);
    }

    let code = codes
        .find_valid(&input.email, input.purpose, &input.code)
        .await?
        .ok_or(AuthServiceError::InvalidCode)?;

    codes.mark_used(code.id).await
}
