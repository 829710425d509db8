use serde::Deserialize;

use crate::domain::repository::BotVerifier;
use crate::error::AuthServiceError;

const SITEVERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// Token the frontend substitutes when `TURNSTILE_ALLOW_DEV_BYPASS` is on.
pub const DEV_BYPASS_TOKEN: &str = "dev-bypass";

/// Cloudflare Turnstile verifier for unauthenticated entry points.
#[derive(Clone)]
pub struct TurnstileVerifier {
    pub client: reqwest::Client,
    pub secret: String,
    /// Accept [`DEV_BYPASS_TOKEN`] without calling Cloudflare. Set only in
    /// local/dev deployments via config; never inferred from the request.
    pub allow_dev_bypass: bool,
}

#[derive(Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

impl BotVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str) -> Result<bool, AuthServiceError> {
        if self.allow_dev_bypass && token == DEV_BYPASS_TOKEN {
            return Ok(true);
        }
        if token.is_empty() {
            return Ok(false);
        }

        // Siteverify accepts a JSON body as well as form encoding.
        let response = self
            .client
            .post(SITEVERIFY_URL)
            .json(&serde_json::json!({
                "secret": self.secret,
                "response": token,
            }))
            .send()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;

        let body: SiteverifyResponse = response
            .json()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;

        if !body.success {
            tracing::debug!(errors = ?body.error_codes, "turnstile verification failed");
        }
        Ok(body.success)
    }
}
