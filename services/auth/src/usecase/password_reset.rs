use crate::domain::password::{LOGIN_PASSWORD_MIN_LEN, hash_password};
use crate::domain::repository::{
    BotVerifier, RateLimiter, UserRepository, VerificationCodeRepository,
};
use crate::domain::types::{
    CODE_RATE_WINDOW_SECS, CodePurpose, MAX_CODES_PER_EMAIL, MAX_CODES_PER_IP,
};
use crate::domain::validate::{normalize_email, validate_email};
use crate::error::AuthServiceError;
use crate::usecase::verification_code::{
    GenerateCodeInput, VerifyCodeInput, consume_verification_code, generate_verification_code,
};

// ── StartPasswordReset ───────────────────────────────────────────────────────

pub struct StartPasswordResetInput {
    pub email: String,
    pub bot_token: String,
    pub client_ip: String,
}

/// Email a reset code. Always succeeds for a well-formed email, whether or
/// not an account exists; the response must not be an account oracle.
pub struct StartPasswordResetUseCase<U, C, R, B>
where
    U: UserRepository,
    C: VerificationCodeRepository,
    R: RateLimiter,
    B: BotVerifier,
{
    pub users: U,
    pub codes: C,
    pub rate_limiter: R,
    pub bot_verifier: B,
}

impl<U, C, R, B> StartPasswordResetUseCase<U, C, R, B>
where
    U: UserRepository,
    C: VerificationCodeRepository,
    R: RateLimiter,
    B: BotVerifier,
{
    pub async fn execute(&self, input: StartPasswordResetInput) -> Result<(), AuthServiceError> {
        if !self.bot_verifier.verify(&input.bot_token).await? {
            return Err(AuthServiceError::BotCheckFailed);
        }

        let email = normalize_email(&input.email);
        if !validate_email(&email) {
            return Err(AuthServiceError::InvalidEmail);
        }

        // No account: skip the send but answer exactly as if one existed.
        // Both windows are checked with the same keys and limits as the real
        // path, so an exhausted window answers 429 for every address.
        if self.users.find_by_email(&email).await?.is_none() {
            let email_key = format!("codes:email:{email}");
            if !self
                .rate_limiter
                .check(&email_key, MAX_CODES_PER_EMAIL, CODE_RATE_WINDOW_SECS)
                .await?
            {
                return Err(AuthServiceError::RateLimited);
            }
            let ip_key = format!("codes:ip:{}", input.client_ip);
            if !self
                .rate_limiter
                .check(&ip_key, MAX_CODES_PER_IP, CODE_RATE_WINDOW_SECS)
                .await?
            {
                return Err(AuthServiceError::RateLimited);
            }
            return Ok(());
        }

        generate_verification_code(
            &self.codes,
            &self.rate_limiter,
            GenerateCodeInput {
                email,
                purpose: CodePurpose::PasswordReset,
                client_ip: input.client_ip,
            },
        )
        .await
    }
}

// ── CompletePasswordReset ────────────────────────────────────────────────────

pub struct CompletePasswordResetInput {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub struct CompletePasswordResetUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub codes: C,
}

impl<U, C> CompletePasswordResetUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub async fn execute(&self, input: CompletePasswordResetInput) -> Result<(), AuthServiceError> {
        if input.new_password.chars().count() < LOGIN_PASSWORD_MIN_LEN {
            return Err(AuthServiceError::WeakPassword(
                "password must be at least 6 characters",
            ));
        }

        let email = normalize_email(&input.email);

        consume_verification_code(
            &self.codes,
            VerifyCodeInput {
                email: email.clone(),
                purpose: CodePurpose::PasswordReset,
                code: input.code,
            },
        )
        .await?;

        // The account disappearing between send and redeem reads the same as
        // a bad code.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::InvalidCode)?;

        let hash = hash_password(&input.new_password)?;
        self.users.set_password_hash(user.id, &hash).await?;
        Ok(())
    }
}
