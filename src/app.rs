use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/dashboard", get(handlers::dashboard))
        .route("/api/dashboard", get(handlers::dashboard_data))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
