use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use uservault_auth_types::cookie::{ACCESS_TOKEN_EXP, MFA_TOKEN_EXP, REFRESH_TOKEN_EXP};
use uservault_auth_types::token::{JwtClaims, SCOPE_MFA_PENDING, SCOPE_SESSION, validate_token};

use crate::domain::repository::UserRepository;
use crate::domain::types::AuthUser;
use crate::error::AuthServiceError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

fn sign(claims: &JwtClaims, secret: &str) -> Result<String, AuthServiceError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))
}

/// Issue a session access token at the given assurance level.
pub fn issue_access_token(
    user: &AuthUser,
    aal: u8,
    secret: &str,
) -> Result<(String, u64), AuthServiceError> {
    let exp = now_secs() + ACCESS_TOKEN_EXP;
    let claims = JwtClaims {
        sub: user.id.to_string(),
        role: user.role,
        aal,
        scope: SCOPE_SESSION.to_owned(),
        exp,
    };
    Ok((sign(&claims, secret)?, exp))
}

/// Issue a session refresh token. Carries the same aal so a refresh never
/// upgrades or downgrades the assurance level.
pub fn issue_refresh_token(
    user: &AuthUser,
    aal: u8,
    secret: &str,
) -> Result<String, AuthServiceError> {
    let exp = now_secs() + REFRESH_TOKEN_EXP;
    let claims = JwtClaims {
        sub: user.id.to_string(),
        role: user.role,
        aal,
        scope: SCOPE_SESSION.to_owned(),
        exp,
    };
    sign(&claims, secret)
}

/// Issue the short-lived token a password-authenticated user holds while an
/// MFA challenge is outstanding. Useless anywhere but the challenge endpoint.
pub fn issue_mfa_token(user: &AuthUser, secret: &str) -> Result<String, AuthServiceError> {
    let claims = JwtClaims {
        sub: user.id.to_string(),
        role: user.role,
        aal: uservault_auth_types::token::AAL1,
        scope: SCOPE_MFA_PENDING.to_owned(),
        exp: now_secs() + MFA_TOKEN_EXP,
    };
    sign(&claims, secret)
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RefreshTokenOutput {
    pub user_id: Uuid,
    pub user_role: u8,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct RefreshTokenUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> RefreshTokenUseCase<U> {
    pub async fn execute(
        &self,
        refresh_token_value: &str,
    ) -> Result<RefreshTokenOutput, AuthServiceError> {
        // Validate refresh token (sig + exp); expired access token is irrelevant here.
        let claims = validate_token(refresh_token_value, &self.jwt_secret)
            .map_err(|_| AuthServiceError::InvalidRefreshToken)?;
        if claims.scope != SCOPE_SESSION {
            return Err(AuthServiceError::InvalidRefreshToken);
        }

        let user_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AuthServiceError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::InvalidRefreshToken)?;
        if user.banned {
            return Err(AuthServiceError::AccountBanned);
        }

        // Preserve the assurance level the session was established at.
        let (access_token, access_token_exp) =
            issue_access_token(&user, claims.aal, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(&user, claims.aal, &self.jwt_secret)?;

        Ok(RefreshTokenOutput {
            user_id: user.id,
            user_role: user.role,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}
