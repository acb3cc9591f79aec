#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use gateway_auth::app::build_router;
use gateway_auth::config::{CorsConfig, HttpLimits, TokenConfig, TokenKey};
use gateway_auth::services::auth::TokenCodec;
use gateway_auth::services::identity::{
    Identity, IdentityError, IdentityStore, InMemoryIdentityStore, Role,
};
use gateway_auth::state::AppState;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct UnreachableStore;

#[async_trait]
impl IdentityStore for UnreachableStore {
    fn backend_name(&self) -> &'static str {
        "unreachable"
    }

    async fn load_by_subject(&self, _subject: &str) -> Result<Identity, IdentityError> {
        Err(IdentityError::Unavailable("pool timed out".to_string()))
    }
}

fn codec() -> Arc<TokenCodec> {
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
    InMemoryIdentityStore::new()
        .with_identity(Identity::new("alice", [Role::User]))
        .with_identity(Identity::new("root", [Role::Admin]))
}

pub fn app_with(store: Arc<dyn IdentityStore>) -> Router {
    let state = AppState::new(codec(), store, "/app");
    build_router(state, &CorsConfig::default(), HttpLimits::default())
}

pub fn app() -> Router {
    app_with(Arc::new(identities()))
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
        json!({"sub": subject, "userId": user_id, "iat": now(), "exp": now() + 900}),
        SECRET,
    )
}

pub fn request(method: &str, uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
