//! Request-time access pipeline: authentication stage → authorization stage.
//!
//! - Paths not in normal form (dot segments, `//`, encoded separators) are
//!   rejected with 400 before either stage runs.
//! - The authentication stage never fails; it records an outcome.
//! - The authorization stage either lets the request continue or short-circuits
//!   with 401/403/503.
//! - On continue, the RequestContext is stored in the request's own extensions.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::RequestContext;
use crate::error::AppError;
use crate::middleware::auth::{filter, routes};
use crate::middleware::auth::policy::Decision;
use crate::state::AppState;

/// Apply the access pipeline to every route (and the fallback) of `router`.
///
/// Example:
/// ```ignore
/// let router = api::routes(&prefix);
/// let router = middleware::auth::access::apply(router, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8: `from_fn` cannot take a State extractor, so pass state explicitly
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !routes::is_normalized(req.uri().path()) {
        tracing::debug!(
            method = %req.method(),
            path = req.uri().path(),
            "rejected path not in normal form"
        );
        return Err(AppError::RequestRejected);
    }

    let ctx = RequestContext::from(
        filter::authenticate(&state, req.method(), req.uri().path(), req.headers()).await,
    );

    match state.policy.decide(req.uri().path(), &ctx) {
        Decision::Permit => {}
        Decision::Deny(denial) => {
            tracing::debug!(
                method = %req.method(),
                path = req.uri().path(),
                ?denial,
                "access denied"
            );
            return Err(denial.into());
        }
    }

    // handed to RequestCtxExtractor
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
