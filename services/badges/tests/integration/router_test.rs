//! HTTP-level checks for the guards that run before any database access:
//! webhook signature verification and bearer-token validation.

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::Utc;
use uuid::Uuid;

use uservault_badges::domain::webhook::sign_webhook;
use uservault_badges::router::build_router;
use uservault_badges::state::AppState;
use uservault_mailer::HttpMailer;
use uservault_testing::token::session_token;

use crate::helpers::TEST_JWT_SECRET;

const WEBHOOK_SECRET: &str = "test-webhook-secret";

fn test_server() -> TestServer {
    let state = AppState {
        db: sea_orm::DatabaseConnection::default(),
        http: reqwest::Client::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        webhook_secret: WEBHOOK_SECRET.to_owned(),
        auth_base_url: "http://auth.invalid".to_owned(),
        internal_token: "internal-token".to_owned(),
        discord_webhook_url: None,
        mailer: HttpMailer::new(
            "http://mail.invalid".to_owned(),
            "key".to_owned(),
            "noreply@example.com".to_owned(),
        ),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn header(name: &'static str, value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(name),
        HeaderValue::from_str(value).unwrap(),
    )
}

#[tokio::test]
async fn should_reject_unsigned_moderation_call() {
    let server = test_server();

    let response = server
        .post(&format!("/badges/requests/{}/approve", Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "MISSING_SIGNATURE");
}

#[tokio::test]
async fn should_reject_stale_timestamp_even_with_valid_signature() {
    let server = test_server();
    let body = b"{}";
    let stale = Utc::now().timestamp() - 301;
    let signature = sign_webhook(WEBHOOK_SECRET, body, stale);

    let (sig_name, sig_value) = header("x-signature", &signature);
    let (ts_name, ts_value) = header("x-timestamp", &stale.to_string());
    let response = server
        .post(&format!("/badges/requests/{}/deny", Uuid::new_v4()))
        .add_header(sig_name, sig_value)
        .add_header(ts_name, ts_value)
        .text("{}")
        .await;

    assert_eq!(response.status_code(), 401);
    let json: serde_json::Value = response.json();
    assert_eq!(json["kind"], "REQUEST_EXPIRED");
}

#[tokio::test]
async fn should_reject_signature_over_different_body() {
    let server = test_server();
    let now = Utc::now().timestamp();
    let signature = sign_webhook(WEBHOOK_SECRET, b"{\"denial_reason\":\"a\"}", now);

    let (sig_name, sig_value) = header("x-signature", &signature);
    let (ts_name, ts_value) = header("x-timestamp", &now.to_string());
    let response = server
        .post(&format!("/badges/requests/{}/deny", Uuid::new_v4()))
        .add_header(sig_name, sig_value)
        .add_header(ts_name, ts_value)
        .text("{\"denial_reason\":\"b\"}")
        .await;

    assert_eq!(response.status_code(), 401);
    let json: serde_json::Value = response.json();
    assert_eq!(json["kind"], "INVALID_SIGNATURE");
}

#[tokio::test]
async fn should_reject_signed_but_malformed_body_as_bad_request() {
    let server = test_server();
    let body = "{not json";
    let now = Utc::now().timestamp();
    let signature = sign_webhook(WEBHOOK_SECRET, body.as_bytes(), now);

    let (sig_name, sig_value) = header("x-signature", &signature);
    let (ts_name, ts_value) = header("x-timestamp", &now.to_string());
    let response = server
        .post(&format!("/badges/requests/{}/deny", Uuid::new_v4()))
        .add_header(sig_name, sig_value)
        .add_header(ts_name, ts_value)
        .text(body)
        .await;

    assert_eq!(response.status_code(), 400);
    let json: serde_json::Value = response.json();
    assert_eq!(json["kind"], "MALFORMED_BODY");
}

#[tokio::test]
async fn should_reject_request_without_bearer_token() {
    let server = test_server();

    let response = server.get("/badges/requests/me").await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn should_reject_token_signed_with_wrong_secret() {
    let server = test_server();
    let token = session_token(Uuid::new_v4(), 0, "some-other-secret");

    let (name, value) = header("authorization", &format!("Bearer {token}"));
    let response = server
        .get("/badges/requests/me")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), 401);
    let json: serde_json::Value = response.json();
    assert_eq!(json["kind"], "INVALID_TOKEN");
}

#[tokio::test]
async fn should_report_healthy() {
    let server = test_server();
    let response = server.get("/healthz").await;
    assert_eq!(response.status_code(), 200);
}
