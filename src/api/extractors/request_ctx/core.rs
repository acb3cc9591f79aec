use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

use super::RequestContext;

/// Extractor for the RequestContext inserted by the access middleware.
/// A missing context means the middleware was not applied; that is answered with 401.
pub struct RequestCtxExtractor(pub RequestContext);

impl FromRequestParts<AppState> for RequestCtxExtractor
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(RequestCtxExtractor)
            .ok_or(AppError::Unauthorized)
    }
}
