use uuid::Uuid;

use crate::domain::repository::{RateLimiter, UserRepository, VerificationCodeRepository};
use crate::domain::types::CodePurpose;
use crate::error::AuthServiceError;
use crate::usecase::verification_code::{
    GenerateCodeInput, VerifyCodeInput, consume_verification_code, generate_verification_code,
};

// ── RequestDeletionCode ──────────────────────────────────────────────────────

/// Email a deletion-confirmation code to the authenticated user.
pub struct RequestDeletionCodeUseCase<U, C, R>
where
    U: UserRepository,
    C: VerificationCodeRepository,
    R: RateLimiter,
{
    pub users: U,
    pub codes: C,
    pub rate_limiter: R,
}

impl<U, C, R> RequestDeletionCodeUseCase<U, C, R>
where
    U: UserRepository,
    C: VerificationCodeRepository,
    R: RateLimiter,
{
    pub async fn execute(&self, user_id: Uuid, client_ip: String) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        generate_verification_code(
            &self.codes,
            &self.rate_limiter,
            GenerateCodeInput {
                email: user.email,
                purpose: CodePurpose::AccountDeletion,
                client_ip,
            },
        )
        .await
    }
}

// ── DeleteAccount ────────────────────────────────────────────────────────────

/// Delete the authenticated user's account after code confirmation. The
/// factors and code rows go with it via FK cascade.
pub struct DeleteAccountUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub codes: C,
}

impl<U, C> DeleteAccountUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub async fn execute(&self, user_id: Uuid, code: String) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        consume_verification_code(
            &self.codes,
            VerifyCodeInput {
                email: user.email,
                purpose: CodePurpose::AccountDeletion,
                code,
            },
        )
        .await?;

        self.users.delete(user_id).await?;
        Ok(())
    }
}
