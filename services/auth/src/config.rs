/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL.
    pub redis_url: String,
    /// HMAC secret for signing JWT access, refresh, and MFA-pending tokens.
    pub jwt_secret: String,
    /// Cookie domain attribute (root domain, e.g. "uservault.app").
    pub cookie_domain: String,
    /// User-facing site origin, used in email deep links. Env var: `PUBLIC_ORIGIN`.
    pub public_origin: String,
    /// TCP port to listen on (default 3201). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// Cloudflare Turnstile secret key.
    pub turnstile_secret: String,
    /// Accept the dev bypass token instead of calling Turnstile. Off unless
    /// `TURNSTILE_ALLOW_DEV_BYPASS=true`; never enable in production.
    pub turnstile_allow_dev_bypass: bool,
    /// Resend-compatible email API endpoint. Env var: `EMAIL_API_URL`.
    pub email_api_url: String,
    /// Email API key. Env var: `EMAIL_API_KEY`.
    pub email_api_key: String,
    /// From address for transactional email. Env var: `EMAIL_FROM`.
    pub email_from: String,
    /// Shared secret for service-to-service endpoints. Env var: `INTERNAL_TOKEN`.
    pub internal_token: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            public_origin: std::env::var("PUBLIC_ORIGIN").expect("PUBLIC_ORIGIN"),
            auth_port: std::env::var("AUTH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3201),
            turnstile_secret: std::env::var("TURNSTILE_SECRET").expect("TURNSTILE_SECRET"),
            turnstile_allow_dev_bypass: std::env::var("TURNSTILE_ALLOW_DEV_BYPASS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            email_api_url: std::env::var("EMAIL_API_URL").expect("EMAIL_API_URL"),
            email_api_key: std::env::var("EMAIL_API_KEY").expect("EMAIL_API_KEY"),
            email_from: std::env::var("EMAIL_FROM").expect("EMAIL_FROM"),
            internal_token: std::env::var("INTERNAL_TOKEN").expect("INTERNAL_TOKEN"),
        }
    }
}
