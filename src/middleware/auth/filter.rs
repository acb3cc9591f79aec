//! Authentication stage: classify → extract bearer → resolve identity → validate.
//!
//! Always yields an [`AuthOutcome`]; nothing raised by the codec or the identity
//! store escapes this function. Whether the request may proceed without an
//! identity is decided afterwards by the access policy.

use axum::http::{HeaderMap, Method, header};

use crate::api::extractors::RequestContext;
use crate::services::auth::token_codec::{TokenError, fingerprint};
use crate::services::identity::{Identity, IdentityError};
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request stayed unauthenticated. Logged, never sent to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unauthenticated {
    MissingCredentials,
    MalformedHeader,
    InvalidToken(TokenError),
    IdentityNotFound,
    IdentityStoreUnavailable,
    ValidationFailed,
    AccountDisabled,
}

#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Bypassed { rule: &'static str },
    Unauthenticated(Unauthenticated),
    Authenticated {
        identity: Identity,
        user_id: Option<String>,
    },
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated { .. })
    }
}

impl From<AuthOutcome> for RequestContext {
    fn from(outcome: AuthOutcome) -> Self {
        match outcome {
            AuthOutcome::Bypassed { rule } => RequestContext::bypassed(rule),
            AuthOutcome::Authenticated { identity, user_id } => {
                RequestContext::authenticated(identity, user_id)
            }
            AuthOutcome::Unauthenticated(Unauthenticated::IdentityStoreUnavailable) => {
                RequestContext {
                    identity_store_unavailable: true,
                    ..RequestContext::anonymous()
                }
            }
            AuthOutcome::Unauthenticated(_) => RequestContext::anonymous(),
        }
    }
}

/// Run the authentication stage for one request.
pub async fn authenticate(
    state: &AppState,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
) -> AuthOutcome {
    if let Some(rule) = state.classifier.classify(method, path) {
        tracing::debug!(%method, path, rule = rule.name, "authentication bypassed");
        return AuthOutcome::Bypassed { rule: rule.name };
    }

    let token = match bearer_token(headers) {
        Ok(token) => token,
        Err(reason) => {
            tracing::debug!(%method, path, ?reason, "no bearer credentials");
            return AuthOutcome::Unauthenticated(reason);
        }
    };

    match verify(state, token).await {
        Ok((identity, user_id)) => {
            tracing::debug!(
                subject = %identity.subject,
                user_id = user_id.as_deref().unwrap_or("-"),
                "request authenticated"
            );
            AuthOutcome::Authenticated { identity, user_id }
        }
        Err(reason) => {
            tracing::debug!(%method, path, token = %fingerprint(token), ?reason, "request left unauthenticated");
            AuthOutcome::Unauthenticated(reason)
        }
    }
}

async fn verify(
    state: &AppState,
    token: &str,
) -> Result<(Identity, Option<String>), Unauthenticated> {
    let subject = state
        .codec
        .extract_subject(token)
        .map_err(Unauthenticated::InvalidToken)?;

    let identity = match state.identities.load_by_subject(&subject).await {
        Ok(identity) => identity,
        Err(IdentityError::NotFound) => return Err(Unauthenticated::IdentityNotFound),
        Err(IdentityError::Unavailable(err)) => {
            tracing::warn!(
                backend = state.identities.backend_name(),
                error = %err,
                "identity store unavailable"
            );
            return Err(Unauthenticated::IdentityStoreUnavailable);
        }
    };

    if !state.codec.validate(token, &identity) {
        tracing::warn!(subject = %subject, "invalid token for user");
        return Err(Unauthenticated::ValidationFailed);
    }

    if !identity.is_usable() {
        tracing::warn!(subject = %subject, "account is disabled, locked or expired");
        return Err(Unauthenticated::AccountDisabled);
    }

    let user_id = match state.codec.extract_user_id(token) {
        Ok(user_id) => Some(user_id),
        Err(TokenError::MissingClaim(_)) => None,
        Err(err) => return Err(Unauthenticated::InvalidToken(err)),
    };

    Ok((identity, user_id))
}

/// `Authorization: Bearer <token>`. The scheme is matched exactly.
fn bearer_token(headers: &HeaderMap) -> Result<&str, Unauthenticated> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(Unauthenticated::MissingCredentials)?;

    let value = value
        .to_str()
        .map_err(|_| Unauthenticated::MalformedHeader)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(Unauthenticated::MalformedHeader)?;

    if token.is_empty() {
        return Err(Unauthenticated::MalformedHeader);
    }

    Ok(token)
}
