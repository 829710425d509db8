use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use uservault_core::health::{healthz, readyz};
use uservault_core::middleware::request_id_layer;

use crate::handlers::{
    requests::{my_request, submit_request},
    review::{approve_request, deny_request},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Requests
        .route("/badges/requests", post(submit_request))
        .route("/badges/requests/me", get(my_request))
        // Moderation bot
        .route("/badges/requests/{request_id}/approve", post(approve_request))
        .route("/badges/requests/{request_id}/deny", post(deny_request))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
