pub mod requests;
pub mod review;

use uservault_auth_types::token::{TokenInfo, validate_access_token};

use crate::error::BadgesServiceError;

/// Validate the bearer access token on an authenticated endpoint.
pub(crate) fn require_session(token: &str, secret: &str) -> Result<TokenInfo, BadgesServiceError> {
    validate_access_token(token, secret).map_err(|_| BadgesServiceError::InvalidToken)
}
