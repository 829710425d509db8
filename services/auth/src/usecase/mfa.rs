use chrono::{DateTime, Utc};
use rand::RngExt;
use uuid::Uuid;

use uservault_auth_types::token::validate_mfa_token;
use uservault_mailer::mask_email;

use crate::domain::repository::{
    MfaFactorRepository, RateLimiter, UserRepository, VerificationCodeRepository,
};
use crate::domain::totp::{base32_encode, otpauth_uri, verify_totp};
use crate::domain::types::{
    CodePurpose, MAX_MFA_EMAILS_PER_USER, MFA_EMAIL_RATE_WINDOW_SECS, MfaFactor, TOTP_SECRET_LEN,
};
use crate::error::AuthServiceError;
use crate::usecase::token::{issue_access_token, issue_refresh_token};
use crate::usecase::verification_code::{
    GenerateCodeInput, VerifyCodeInput, consume_verification_code, generate_verification_code,
};

/// Issuer shown in authenticator apps.
const OTP_ISSUER: &str = "UserVault";

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

// ── Enroll ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct EnrollMfaOutput {
    pub factor_id: Uuid,
    /// Base32 secret for manual entry.
    pub secret: String,
    /// Provisioning URI for QR rendering on the client.
    pub otpauth_uri: String,
}

pub struct EnrollMfaUseCase<U, M>
where
    U: UserRepository,
    M: MfaFactorRepository,
{
    pub users: U,
    pub factors: M,
}

impl<U, M> EnrollMfaUseCase<U, M>
where
    U: UserRepository,
    M: MfaFactorRepository,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<EnrollMfaOutput, AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        if self.factors.find_verified_by_user(user_id).await?.is_some() {
            return Err(AuthServiceError::MfaAlreadyEnrolled);
        }

        // Restarting enrollment invalidates any half-finished attempt.
        self.factors.delete_unverified_by_user(user_id).await?;

        let mut secret = vec![0u8; TOTP_SECRET_LEN];
        rand::rng().fill(secret.as_mut_slice());

        let factor = MfaFactor {
            id: Uuid::new_v4(),
            user_id,
            secret: secret.clone(),
            verified_at: None,
            created_at: Utc::now(),
        };
        self.factors.create(&factor).await?;

        Ok(EnrollMfaOutput {
            factor_id: factor.id,
            secret: base32_encode(&secret),
            otpauth_uri: otpauth_uri(OTP_ISSUER, &user.email, &secret),
        })
    }
}

// ── VerifyEnrollment ─────────────────────────────────────────────────────────

pub struct VerifyEnrollmentInput {
    pub user_id: Uuid,
    pub factor_id: Uuid,
    pub code: String,
}

/// Prove possession of the freshly enrolled secret. Only after this does the
/// factor start gating logins.
pub struct VerifyEnrollmentUseCase<M: MfaFactorRepository> {
    pub factors: M,
}

impl<M: MfaFactorRepository> VerifyEnrollmentUseCase<M> {
    pub async fn execute(&self, input: VerifyEnrollmentInput) -> Result<(), AuthServiceError> {
        let factor = self
            .factors
            .find_by_id(input.factor_id)
            .await?
            .filter(|f| f.user_id == input.user_id)
            .ok_or(AuthServiceError::FactorNotFound)?;

        if factor.is_verified() {
            return Err(AuthServiceError::MfaAlreadyEnrolled);
        }

        if !verify_totp(&factor.secret, &input.code, now_secs()) {
            return Err(AuthServiceError::MfaFailed);
        }

        self.factors.mark_verified(factor.id).await?;
        Ok(())
    }
}

// ── Unenroll ─────────────────────────────────────────────────────────────────

pub struct UnenrollMfaUseCase<M: MfaFactorRepository> {
    pub factors: M,
}

impl<M: MfaFactorRepository> UnenrollMfaUseCase<M> {
    pub async fn execute(&self, user_id: Uuid, factor_id: Uuid) -> Result<(), AuthServiceError> {
        let deleted = self.factors.delete(factor_id, user_id).await?;
        if !deleted {
            return Err(AuthServiceError::FactorNotFound);
        }
        Ok(())
    }
}

// ── List ─────────────────────────────────────────────────────────────────────

/// Factor as shown to its owner. The secret never leaves the service after
/// enrollment.
#[derive(Debug)]
pub struct FactorView {
    pub id: Uuid,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

pub struct ListMfaFactorsUseCase<M: MfaFactorRepository> {
    pub factors: M,
}

impl<M: MfaFactorRepository> ListMfaFactorsUseCase<M> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<FactorView>, AuthServiceError> {
        let factors = self.factors.list_by_user(user_id).await?;
        Ok(factors
            .into_iter()
            .map(|f| FactorView {
                id: f.id,
                verified: f.is_verified(),
                created_at: f.created_at,
            })
            .collect())
    }
}

// ── SendMfaEmail ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SendMfaEmailOutput {
    /// e.g. `jo***@example.com`, enough for the user to recognize the inbox.
    pub masked_email: String,
}

/// Email fallback during an MFA challenge: send a one-time code to the
/// account's address. Gated on the MFA-pending token from login.
pub struct SendMfaEmailUseCase<U, C, R>
where
    U: UserRepository,
    C: VerificationCodeRepository,
    R: RateLimiter,
{
    pub users: U,
    pub codes: C,
    pub rate_limiter: R,
    pub jwt_secret: String,
}

impl<U, C, R> SendMfaEmailUseCase<U, C, R>
where
    U: UserRepository,
    C: VerificationCodeRepository,
    R: RateLimiter,
{
    pub async fn execute(
        &self,
        mfa_token: &str,
        client_ip: String,
    ) -> Result<SendMfaEmailOutput, AuthServiceError> {
        let info = validate_mfa_token(mfa_token, &self.jwt_secret)
            .map_err(|_| AuthServiceError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(info.user_id)
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;

        // Tighter per-user window than the general code limits; challenge
        // emails are the easiest thing on the service to spam.
        let key = format!("mfa_email:user:{}", user.id);
        if !self
            .rate_limiter
            .check(&key, MAX_MFA_EMAILS_PER_USER, MFA_EMAIL_RATE_WINDOW_SECS)
            .await?
        {
            return Err(AuthServiceError::RateLimited);
        }

        generate_verification_code(
            &self.codes,
            &self.rate_limiter,
            GenerateCodeInput {
                email: user.email.clone(),
                purpose: CodePurpose::MfaEmail,
                client_ip,
            },
        )
        .await?;

        Ok(SendMfaEmailOutput {
            masked_email: mask_email(&user.email),
        })
    }
}

// ── CompleteMfaChallenge ─────────────────────────────────────────────────────

/// Which second factor the client is answering with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeMethod {
    Totp,
    Email,
}

pub struct CompleteMfaChallengeInput {
    pub mfa_token: String,
    pub method: ChallengeMethod,
    pub code: String,
}

#[derive(Debug)]
pub struct CompleteMfaChallengeOutput {
    pub user_id: Uuid,
    pub user_role: u8,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct CompleteMfaChallengeUseCase<U, M, C>
where
    U: UserRepository,
    M: MfaFactorRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub factors: M,
    pub codes: C,
    pub jwt_secret: String,
}

impl<U, M, C> CompleteMfaChallengeUseCase<U, M, C>
where
    U: UserRepository,
    M: MfaFactorRepository,
    C: VerificationCodeRepository,
{
    pub async fn execute(
        &self,
        input: CompleteMfaChallengeInput,
    ) -> Result<CompleteMfaChallengeOutput, AuthServiceError> {
        let info = validate_mfa_token(&input.mfa_token, &self.jwt_secret)
            .map_err(|_| AuthServiceError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(info.user_id)
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;
        if user.banned {
            return Err(AuthServiceError::AccountBanned);
        }

        match input.method {
            ChallengeMethod::Totp => {
                let factor = self
                    .factors
                    .find_verified_by_user(user.id)
                    .await?
                    .ok_or(AuthServiceError::MfaFailed)?;
                if !verify_totp(&factor.secret, &input.code, now_secs()) {
                    return Err(AuthServiceError::MfaFailed);
                }
            }
            ChallengeMethod::Email => {
                consume_verification_code(
                    &self.codes,
                    VerifyCodeInput {
                        email: user.email.clone(),
                        purpose: CodePurpose::MfaEmail,
                        code: input.code,
                    },
                )
                .await
                // A challenge failure is a challenge failure regardless of
                // which factor was tried.
                .map_err(|e| match e {
                    AuthServiceError::InvalidCode | AuthServiceError::InvalidCodeFormat => {
                        AuthServiceError::MfaFailed
                    }
                    other => other,
                })?;
            }
        }

        let aal = uservault_auth_types::token::AAL2;
        let (access_token, access_token_exp) = issue_access_token(&user, aal, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(&user, aal, &self.jwt_secret)?;

        Ok(CompleteMfaChallengeOutput {
            user_id: user.id,
            user_role: user.role,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}
