/*
 * Responsibility
 * - Config → shared services → Router assembly
 * - Layer order (outer → inner): http plumbing, CORS, security headers, access pipeline
 * - axum::serve() with graceful shutdown
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{Config, CorsConfig, HttpLimits};
use crate::middleware;
use crate::services::{auth::build_token_codec, identity::build_identity_store};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,gateway_auth=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics through tracing as well; stderr may be hidden by the launcher.
        tracing::error!(?info, "panic");

        // Development: crash the process so the bug is noticed immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;

    init_panic_hook(!config.app_env.is_production());

    let state = build_state(&config)?;

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        prefix = %config.path_prefix,
        identity_store = state.identities.backend_name(),
        "starting gateway"
    );

    let app = build_router(state, &config.cors, config.http);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("gateway stopped");
    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState> {
    // Built once; read-only afterwards and shared across all requests.
    let codec = build_token_codec(config).context("building token codec")?;
    let identities = build_identity_store(config).context("building identity store")?;

    Ok(AppState::new(codec, identities, &config.path_prefix))
}

pub fn build_router(state: AppState, cors: &CorsConfig, limits: HttpLimits) -> Router {
    let router = api::routes(&state.path_prefix);
    let router = middleware::auth::access::apply(router, state.clone());
    let router = router.with_state(state);
    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, cors);
    middleware::http::apply(router, limits)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
