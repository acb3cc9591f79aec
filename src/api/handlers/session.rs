/*
 * Responsibility
 * - GET {prefix}/api/session: echo the authenticated context back to the caller
 * - Lets clients check a token against the gateway without reaching a backend
 */
use axum::Json;

use crate::api::dto::session::SessionResponse;
use crate::api::extractors::RequestCtxExtractor;

pub async fn session(RequestCtxExtractor(ctx): RequestCtxExtractor) -> Json<SessionResponse> {
    Json(SessionResponse::from(&ctx))
}
