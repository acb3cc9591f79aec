/*
 * Responsibility
 * - The per-request authentication result seen by downstream stages
 * - The access middleware builds it and stores it in request extensions;
 *   handlers only ever receive this type
 *
 * Notes
 * - Lives exactly as long as the request; never shared between requests
 */

use crate::services::identity::Identity;

/// Outcome of authentication for one request.
///
/// - `identity` is set only when a valid token matched a usable account
/// - `user_id` is the token's `userId` claim (external identifier of the account)
/// - `bypassed_by` names the public-route rule that skipped authentication, if any
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub identity: Option<Identity>,
    pub user_id: Option<String>,
    pub bypassed_by: Option<&'static str>,
    pub identity_store_unavailable: bool,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Identity, user_id: Option<String>) -> Self {
        Self {
            identity: Some(identity),
            user_id,
            ..Self::default()
        }
    }

    pub fn bypassed(rule: &'static str) -> Self {
        Self {
            bypassed_by: Some(rule),
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed_by.is_some()
    }

    pub fn subject(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.subject.as_str())
    }
}
