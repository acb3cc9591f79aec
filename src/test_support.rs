//! Shared fixtures for unit tests.
use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;

use crate::config::{TokenConfig, TokenKey};
use crate::services::auth::TokenCodec;
use crate::services::identity::{Identity, IdentityError, IdentityStore, InMemoryIdentityStore, Role};
use crate::state::AppState;

pub const SECRET: &str = "unit-test-secret-unit-test-secret-0123";

pub struct FailingStore;

#[async_trait]
impl IdentityStore for FailingStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn load_by_subject(&self, _subject: &str) -> Result<Identity, IdentityError> {
        Err(IdentityError::Unavailable("connection refused".to_string()))
    }
}

pub fn codec() -> Arc<TokenCodec> {
    Arc::new(
        TokenCodec::new(&TokenConfig {
            key: TokenKey::Hmac(SECRET.to_string()),
            issuer: None,
            audience: None,
            leeway_seconds: 0,
        })
        .expect("codec"),
    )
}

pub fn identities() -> InMemoryIdentityStore {
    let mut carol = Identity::new("carol", [Role::User]);
    carol.account_enabled = false;

    InMemoryIdentityStore::new()
        .with_identity(Identity::new("alice", [Role::User]))
        .with_identity(Identity::new("admin", [Role::Admin]))
        .with_identity(carol)
}

pub fn state() -> AppState {
    AppState::new(codec(), Arc::new(identities()), "/app")
}

pub fn state_with_failing_store() -> AppState {
    AppState::new(codec(), Arc::new(FailingStore), "/app")
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn sign(claims: serde_json::Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign")
}

pub fn token(subject: &str, user_id: &str) -> String {
    sign(
        json!({"sub": subject, "userId": user_id, "iat": now(), "exp": now() + 600}),
        SECRET,
    )
}

/// Replace the first signature character so the signature decodes but no longer verifies.
pub fn tamper_signature(token: &str) -> String {
    let (head, signature) = token.rsplit_once('.').expect("jws");
    let mut chars: Vec<char> = signature.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    format!("{head}.{}", chars.into_iter().collect::<String>())
}
