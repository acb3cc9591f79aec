/*
 * Responsibility
 * - Response DTO for the session check
 */
use serde::Serialize;

use crate::api::extractors::RequestContext;
use crate::services::identity::Role;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub roles: Vec<Role>,
}

impl From<&RequestContext> for SessionResponse {
    fn from(ctx: &RequestContext) -> Self {
        Self {
            authenticated: ctx.is_authenticated(),
            username: ctx.subject().map(str::to_string),
            user_id: ctx.user_id.clone(),
            roles: ctx
                .identity
                .as_ref()
                .map(|i| i.roles.iter().copied().collect())
                .unwrap_or_default(),
        }
    }
}
