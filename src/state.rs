/*
 * Responsibility
 * - Shared, read-only context attached to the Router (AppState)
 *   - token codec, identity store, route classifier, access policy
 * - Cheap to clone (everything behind Arc); nothing here is mutated per request
 */
use std::sync::Arc;

use crate::middleware::auth::{policy::AccessPolicy, routes::RouteClassifier};
use crate::services::{auth::TokenCodec, identity::IdentityStore};

#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub identities: Arc<dyn IdentityStore>,
    pub classifier: Arc<RouteClassifier>,
    pub policy: Arc<AccessPolicy>,
    pub path_prefix: Arc<str>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("codec", &self.codec)
            .field("identities", &self.identities.backend_name())
            .field("path_prefix", &self.path_prefix)
            .finish()
    }
}

impl AppState {
    pub fn new(codec: Arc<TokenCodec>, identities: Arc<dyn IdentityStore>, path_prefix: &str) -> Self {
        Self {
            codec,
            identities,
            classifier: Arc::new(RouteClassifier::new(path_prefix)),
            policy: Arc::new(AccessPolicy::new(path_prefix)),
            path_prefix: Arc::from(path_prefix),
        }
    }
}
