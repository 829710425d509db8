use serde::Deserialize;
use uuid::Uuid;

use crate::domain::repository::UserDirectory;
use crate::domain::types::DirectoryUser;
use crate::error::BadgesServiceError;

/// User lookup against the auth service's internal endpoint, authenticated
/// with the shared `x-internal-token` header.
#[derive(Clone)]
pub struct HttpUserDirectory {
    pub client: reqwest::Client,
    pub auth_base_url: String,
    pub internal_token: String,
}

#[derive(Deserialize)]
struct InternalUser {
    id: Uuid,
    email: String,
    username: String,
}

impl UserDirectory for HttpUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DirectoryUser>, BadgesServiceError> {
        let url = format!("{}/internal/users/{id}", self.auth_base_url);
        let response = self
            .client
            .get(&url)
            .header("x-internal-token", &self.internal_token)
            .send()
            .await
            .map_err(|e| BadgesServiceError::Internal(e.into()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(BadgesServiceError::Internal(anyhow::anyhow!(
                "user directory returned {}",
                response.status()
            )));
        }

        let user: InternalUser = response
            .json()
            .await
            .map_err(|e| BadgesServiceError::Internal(e.into()))?;

        Ok(Some(DirectoryUser {
            id: user.id,
            email: user.email,
            username: user.username,
        }))
    }
}
