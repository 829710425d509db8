use sea_orm::Database;
use tracing::info;

use uservault_badges::config::BadgesConfig;
use uservault_badges::router::build_router;
use uservault_badges::state::AppState;
use uservault_mailer::HttpMailer;

#[tokio::main]
async fn main() {
    uservault_core::tracing::init_tracing();

    let config = BadgesConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = HttpMailer::new(
        config.email_api_url.clone(),
        config.email_api_key.clone(),
        config.email_from.clone(),
    );

    let state = AppState {
        db,
        http: reqwest::Client::new(),
        jwt_secret: config.jwt_secret,
        webhook_secret: config.webhook_secret,
        auth_base_url: config.auth_base_url,
        internal_token: config.internal_token,
        discord_webhook_url: config.discord_webhook_url,
        mailer,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.badges_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("badges service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
