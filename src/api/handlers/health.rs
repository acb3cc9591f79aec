/*
 * Responsibility
 * - GET /actuator/health, GET /actuator/info
 * - Public by the route classifier; never touch the identity store
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "UP"})))
}

pub async fn info() -> impl IntoResponse {
    Json(json!({
        "app": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}
