use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use uservault_core::health::{healthz, readyz};
use uservault_core::middleware::request_id_layer;

use crate::handlers::{
    account::{delete_account, request_deletion_code},
    internal,
    mfa::{
        complete_challenge, delete_factor, enroll_factor, list_factors, send_mfa_email,
        verify_factor,
    },
    password::{complete_password_reset, start_password_reset},
    signup::{complete_signup, start_signup},
    token::{check_token, login, refresh_token, revoke_token},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Signup
        .route("/auth/signup/code", post(start_signup))
        .route("/auth/signup", post(complete_signup))
        // Token
        .route("/auth/token", get(check_token))
        .route("/auth/token", post(login))
        .route("/auth/token", patch(refresh_token))
        .route("/auth/token", delete(revoke_token))
        // Password reset
        .route("/auth/password/code", post(start_password_reset))
        .route("/auth/password/reset", post(complete_password_reset))
        // Account deletion
        .route("/auth/account/deletion/code", post(request_deletion_code))
        .route("/auth/account", delete(delete_account))
        // MFA
        .route("/auth/mfa/factors", post(enroll_factor))
        .route("/auth/mfa/factors", get(list_factors))
        .route("/auth/mfa/factors/{factor_id}/verify", post(verify_factor))
        .route("/auth/mfa/factors/{factor_id}", delete(delete_factor))
        .route("/auth/mfa/email", post(send_mfa_email))
        .route("/auth/mfa/challenge", post(complete_challenge))
        // Internal
        .route("/internal/users/{user_id}", get(internal::get_user))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
