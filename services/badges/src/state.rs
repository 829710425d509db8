use sea_orm::DatabaseConnection;

use uservault_mailer::HttpMailer;

use crate::infra::db::DbBadgeRequestRepository;
use crate::infra::directory::HttpUserDirectory;
use crate::infra::discord::DiscordNotifier;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub jwt_secret: String,
    pub webhook_secret: String,
    pub auth_base_url: String,
    pub internal_token: String,
    pub discord_webhook_url: Option<String>,
    pub mailer: HttpMailer,
}

impl AppState {
    pub fn request_repo(&self) -> DbBadgeRequestRepository {
        DbBadgeRequestRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_directory(&self) -> HttpUserDirectory {
        HttpUserDirectory {
            client: self.http.clone(),
            auth_base_url: self.auth_base_url.clone(),
            internal_token: self.internal_token.clone(),
        }
    }

    pub fn notifier(&self) -> DiscordNotifier {
        DiscordNotifier {
            client: self.http.clone(),
            webhook_url: self.discord_webhook_url.clone(),
        }
    }
}
