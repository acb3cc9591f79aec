//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Server-to-server calls through the gateway are not
//!   restricted by it.
//! - The policy is static configuration, built once when the router is assembled.
//!
//! Policy:
//! - Credentials (cookies / Authorization) are allowed.
//! - Development: any origin, by mirroring the request `Origin`.
//! - Production: allowlist origins from Config (comma-separated env var).
//! - `Authorization` and `Content-Type` are exposed to scripts.

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Apply CORS policy to the given Router.
///
/// IMPORTANT:
/// - Wildcards (`Any`) cannot be combined with `allow_credentials(true)`; origin and
///   headers are mirrored from the request instead.
pub fn apply(router: Router, config: &CorsConfig) -> Router {
    router.layer(layer(config))
}

pub fn layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.app_env.is_production() {
        // Production: exact match only. An empty allowlist allows no cross-origin caller.
        let allowed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        })
    } else {
        AllowOrigin::mirror_request()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(config.max_age)
}
