/*
 * Responsibility
 * - URL layout of the endpoints served by the gateway itself
 * - Everything else falls through to a 404 (backend dispatch is not done here)
 * - The access pipeline is layered on top in app.rs, so it covers the fallback too
 */
use axum::{Router, routing::get};

use crate::api::handlers::{
    health::{health, info},
    session::session,
};
use crate::error::AppError;
use crate::state::AppState;

pub fn routes(prefix: &str) -> Router<AppState> {
    Router::new()
        .route("/actuator/health", get(health))
        .route("/actuator/info", get(info))
        .route(&format!("{prefix}/api/session"), get(session))
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::not_found("route")
}
