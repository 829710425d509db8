use uuid::Uuid;

use crate::domain::password::{LOGIN_PASSWORD_MIN_LEN, verify_password};
use crate::domain::repository::{BotVerifier, MfaFactorRepository, UserRepository};
use crate::error::AuthServiceError;
use crate::usecase::token::{issue_access_token, issue_mfa_token, issue_refresh_token};

pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub bot_token: String,
}

/// Outcome of a correct password. A verified second factor turns the login
/// into a pending challenge instead of a session.
#[derive(Debug)]
pub enum LoginOutput {
    Session {
        user_id: Uuid,
        user_role: u8,
        access_token: String,
        access_token_exp: u64,
        refresh_token: String,
    },
    MfaRequired {
        factor_id: Uuid,
        mfa_token: String,
    },
}

pub struct LoginUseCase<U, M, B>
where
    U: UserRepository,
    M: MfaFactorRepository,
    B: BotVerifier,
{
    pub users: U,
    pub factors: M,
    pub bot_verifier: B,
    pub jwt_secret: String,
}

impl<U, M, B> LoginUseCase<U, M, B>
where
    U: UserRepository,
    M: MfaFactorRepository,
    B: BotVerifier,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        if !self.bot_verifier.verify(&input.bot_token).await? {
            return Err(AuthServiceError::BotCheckFailed);
        }

        // The login-side length floor predates the stricter signup policy;
        // old accounts still carry 6-char passwords.
        if input.password.chars().count() < LOGIN_PASSWORD_MIN_LEN {
            return Err(AuthServiceError::InvalidCredential);
        }

        let email = crate::domain::validate::normalize_email(&input.email);
        // Unknown email and wrong password are indistinguishable to the caller.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::InvalidCredential)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AuthServiceError::InvalidCredential);
        }

        // Ban check happens after the password so the response does not
        // reveal ban status to someone who cannot authenticate anyway.
        if user.banned {
            return Err(AuthServiceError::AccountBanned);
        }

        if let Some(factor) = self.factors.find_verified_by_user(user.id).await? {
            let mfa_token = issue_mfa_token(&user, &self.jwt_secret)?;
            return Ok(LoginOutput::MfaRequired {
                factor_id: factor.id,
                mfa_token,
            });
        }

        let aal = uservault_auth_types::token::AAL1;
        let (access_token, access_token_exp) = issue_access_token(&user, aal, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(&user, aal, &self.jwt_secret)?;

        Ok(LoginOutput::Session {
            user_id: user.id,
            user_role: user.role,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}
