//! Authorization stage: which role a route needs, and whether the request has it.

use crate::api::extractors::RequestContext;
use crate::error::AppError;
use crate::services::identity::Role;

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const USER_OR_ADMIN: &[Role] = &[Role::User, Role::Admin];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    AnyRole(&'static [Role]),
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Unauthenticated,
    Forbidden,
    IdentityStoreUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    Deny(Denial),
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated => AppError::Unauthorized,
            Denial::Forbidden => AppError::Forbidden,
            Denial::IdentityStoreUnavailable => AppError::ServiceUnavailable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    api_root: String,
}

impl AccessPolicy {
    pub fn new(prefix: &str) -> Self {
        Self {
            api_root: format!("{prefix}/api"),
        }
    }

    /// Routes the authentication stage bypassed are public; the rest is
    /// matched on path segments.
    pub fn requirement(&self, path: &str, ctx: &RequestContext) -> Requirement {
        if ctx.is_bypassed() {
            Requirement::Public
        } else if under(path, "/actuator") {
            Requirement::AnyRole(ADMIN_ONLY)
        } else if under(path, &self.api_root) {
            Requirement::AnyRole(USER_OR_ADMIN)
        } else {
            Requirement::Authenticated
        }
    }

    pub fn evaluate(&self, requirement: Requirement, ctx: &RequestContext) -> Decision {
        if requirement == Requirement::Public {
            return Decision::Permit;
        }

        let Some(identity) = ctx.identity.as_ref() else {
            return Decision::Deny(if ctx.identity_store_unavailable {
                Denial::IdentityStoreUnavailable
            } else {
                Denial::Unauthenticated
            });
        };

        match requirement {
            Requirement::AnyRole(roles) if !identity.has_any_role(roles) => {
                Decision::Deny(Denial::Forbidden)
            }
            _ => Decision::Permit,
        }
    }

    pub fn decide(&self, path: &str, ctx: &RequestContext) -> Decision {
        self.evaluate(self.requirement(path, ctx), ctx)
    }
}

/// `base` itself or anything below it, on a segment boundary.
fn under(path: &str, base: &str) -> bool {
    match path.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::identity::Identity;

    fn policy() -> AccessPolicy {
        AccessPolicy::new("/app")
    }

    fn ctx_with(roles: &[Role]) -> RequestContext {
        RequestContext::authenticated(Identity::new("u", roles.iter().copied()), Some("1".into()))
    }

    #[test]
    fn bypassed_requests_need_nothing() {
        let ctx = RequestContext::bypassed("catalog-read");
        assert_eq!(policy().requirement("/app/api/products", &ctx), Requirement::Public);
        assert_eq!(policy().decide("/app/api/products", &ctx), Decision::Permit);
    }

    #[test]
    fn api_routes_need_user_or_admin() {
        let anonymous = RequestContext::anonymous();
        assert_eq!(
            policy().decide("/app/api/orders", &anonymous),
            Decision::Deny(Denial::Unauthenticated)
        );
        assert_eq!(policy().decide("/app/api/orders", &ctx_with(&[Role::User])), Decision::Permit);
        assert_eq!(policy().decide("/app/api/orders/3", &ctx_with(&[Role::Admin])), Decision::Permit);
        assert_eq!(
            policy().decide("/app/api/orders", &ctx_with(&[])),
            Decision::Deny(Denial::Forbidden)
        );
    }

    #[test]
    fn actuator_needs_admin() {
        assert_eq!(
            policy().decide("/actuator/env", &ctx_with(&[Role::User])),
            Decision::Deny(Denial::Forbidden)
        );
        assert_eq!(policy().decide("/actuator/env", &ctx_with(&[Role::Admin])), Decision::Permit);
        assert_eq!(
            policy().decide("/actuator", &RequestContext::anonymous()),
            Decision::Deny(Denial::Unauthenticated)
        );
    }

    #[test]
    fn other_paths_need_any_identity() {
        assert_eq!(
            policy().requirement("/dashboard", &RequestContext::anonymous()),
            Requirement::Authenticated
        );
        assert_eq!(policy().decide("/dashboard", &ctx_with(&[])), Decision::Permit);
        assert_eq!(
            policy().decide("/dashboard", &RequestContext::anonymous()),
            Decision::Deny(Denial::Unauthenticated)
        );
    }

    #[test]
    fn segment_boundary_is_respected() {
        let anonymous = RequestContext::anonymous();
        assert_eq!(policy().requirement("/app/apis", &anonymous), Requirement::Authenticated);
        assert_eq!(policy().requirement("/actuators", &anonymous), Requirement::Authenticated);
        assert_eq!(
            policy().requirement("/app/api", &anonymous),
            Requirement::AnyRole(USER_OR_ADMIN)
        );
    }

    #[test]
    fn store_outage_is_distinguished_from_missing_identity() {
        let ctx = RequestContext {
            identity_store_unavailable: true,
            ..RequestContext::anonymous()
        };
        assert_eq!(
            policy().decide("/app/api/orders", &ctx),
            Decision::Deny(Denial::IdentityStoreUnavailable)
        );
    }

    #[test]
    fn denials_map_to_status_codes() {
        use axum::http::StatusCode;
        assert_eq!(AppError::from(Denial::Unauthenticated).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::from(Denial::Forbidden).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::from(Denial::IdentityStoreUnavailable).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
