use chrono::Utc;
use uuid::Uuid;

use crate::domain::password::{check_signup_password, hash_password};
use crate::domain::repository::{
    BotVerifier, RateLimiter, UserRepository, VerificationCodeRepository,
};
use crate::domain::types::{AuthUser, CodePurpose};
use crate::domain::validate::{
    normalize_email, normalize_username, validate_email, validate_username,
};
use crate::error::AuthServiceError;
use crate::usecase::token::{issue_access_token, issue_refresh_token};
use crate::usecase::verification_code::{
    GenerateCodeInput, VerifyCodeInput, consume_verification_code, generate_verification_code,
};

// ── StartSignup ──────────────────────────────────────────────────────────────

pub struct StartSignupInput {
    pub email: String,
    pub bot_token: String,
    pub client_ip: String,
}

/// First signup step: bot check, then email a code.
pub struct StartSignupUseCase<U, C, R, B>
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

impl<U, C, R, B> StartSignupUseCase<U, C, R, B>
where
    U: UserRepository,
    C: VerificationCodeRepository,
    R: RateLimiter,
    B: BotVerifier,
{
    pub async fn execute(&self, input: StartSignupInput) -> Result<(), AuthServiceError> {
        if !self.bot_verifier.verify(&input.bot_token).await? {
            return Err(AuthServiceError::BotCheckFailed);
        }

        let email = normalize_email(&input.email);
        if !validate_email(&email) {
            return Err(AuthServiceError::InvalidEmail);
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::EmailTaken);
        }

        generate_verification_code(
            &self.codes,
            &self.rate_limiter,
            GenerateCodeInput {
                email,
                purpose: CodePurpose::Signup,
                client_ip: input.client_ip,
            },
        )
        .await
    }
}

// ── CompleteSignup ───────────────────────────────────────────────────────────

pub struct CompleteSignupInput {
    pub email: String,
    pub code: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct CompleteSignupOutput {
    pub user: AuthUser,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

/// Second signup step: burn the code, create the account, open a session.
pub struct CompleteSignupUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub codes: C,
    pub jwt_secret: String,
}

impl<U, C> CompleteSignupUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub async fn execute(
        &self,
        input: CompleteSignupInput,
    ) -> Result<CompleteSignupOutput, AuthServiceError> {
        let email = normalize_email(&input.email);
        let username = normalize_username(&input.username);
        if !validate_username(&username) {
            return Err(AuthServiceError::InvalidUsername);
        }
        check_signup_password(&input.password).map_err(AuthServiceError::WeakPassword)?;

        // Verify and consume the code before the uniqueness checks so a
        // guessed email cannot probe which usernames exist.
        consume_verification_code(
            &self.codes,
            VerifyCodeInput {
                email: email.clone(),
                purpose: CodePurpose::Signup,
                code: input.code,
            },
        )
        .await?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::EmailTaken);
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AuthServiceError::UsernameTaken);
        }

        let user = AuthUser {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash: hash_password(&input.password)?,
            role: 0,
            banned: false,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;

        // New accounts have no second factor yet.
        let aal = uservault_auth_types::token::AAL1;
        let (access_token, access_token_exp) = issue_access_token(&user, aal, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(&user, aal, &self.jwt_secret)?;

        Ok(CompleteSignupOutput {
            user,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}
