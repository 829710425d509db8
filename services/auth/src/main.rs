use sea_orm::Database;
use tracing::info;

use uservault_auth::config::AuthConfig;
use uservault_auth::infra::outbox::OutboxRelay;
use uservault_auth::router::build_router;
use uservault_auth::state::AppState;
use uservault_mailer::HttpMailer;

#[tokio::main]
async fn main() {
    uservault_core::tracing::init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let mailer = HttpMailer::new(
        config.email_api_url.clone(),
        config.email_api_key.clone(),
        config.email_from.clone(),
    );
    let relay = OutboxRelay {
        db: db.clone(),
        mailer,
        public_origin: config.public_origin.clone(),
    };
    tokio::spawn(relay.run());

    let state = AppState {
        db,
        redis,
        http: reqwest::Client::new(),
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        turnstile_secret: config.turnstile_secret,
        turnstile_allow_dev_bypass: config.turnstile_allow_dev_bypass,
        internal_token: config.internal_token,
    };

    if state.turnstile_allow_dev_bypass {
        tracing::warn!("turnstile dev bypass is enabled; do not run this in production");
    }

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
