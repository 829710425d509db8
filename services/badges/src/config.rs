/// Badges service configuration loaded from environment variables.
#[derive(Debug)]
pub struct BadgesConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for validating bearer access tokens (shared with auth).
    pub jwt_secret: String,
    /// HMAC secret shared with the moderation bot for webhook signatures.
    pub webhook_secret: String,
    /// Auth service base URL for internal user lookups. Env var: `AUTH_BASE_URL`.
    pub auth_base_url: String,
    /// Shared secret for service-to-service calls. Env var: `INTERNAL_TOKEN`.
    pub internal_token: String,
    /// Discord channel webhook for new-request notifications; optional.
    /// Env var: `DISCORD_BADGE_REQUEST_WEBHOOK`.
    pub discord_webhook_url: Option<String>,
    /// TCP port to listen on (default 3202). Env var: `BADGES_PORT`.
    pub badges_port: u16,
    /// Resend-compatible email API endpoint. Env var: `EMAIL_API_URL`.
    pub email_api_url: String,
    /// Email API key. Env var: `EMAIL_API_KEY`.
    pub email_api_key: String,
    /// From address for transactional email. Env var: `EMAIL_FROM`.
    pub email_from: String,
}

impl BadgesConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            webhook_secret: std::env::var("DISCORD_WEBHOOK_SECRET").expect("DISCORD_WEBHOOK_SECRET"),
            auth_base_url: std::env::var("AUTH_BASE_URL").expect("AUTH_BASE_URL"),
            internal_token: std::env::var("INTERNAL_TOKEN").expect("INTERNAL_TOKEN"),
            discord_webhook_url: std::env::var("DISCORD_BADGE_REQUEST_WEBHOOK").ok(),
            badges_port: std::env::var("BADGES_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3202),
            email_api_url: std::env::var("EMAIL_API_URL").expect("EMAIL_API_URL"),
            email_api_key: std::env::var("EMAIL_API_KEY").expect("EMAIL_API_KEY"),
            email_from: std::env::var("EMAIL_FROM").expect("EMAIL_FROM"),
        }
    }
}
