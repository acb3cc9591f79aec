use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::{TokenConfig, TokenKey};
use crate::services::identity::Identity;

/// Why a presented token could not be turned into claims.
///
/// Every variant is recoverable: the request simply stays unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("missing '{0}' claim")]
    MissingClaim(&'static str),
    #[error("token expired")]
    Expired,
    #[error("signature invalid")]
    SignatureInvalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::SignatureInvalid,
            ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => Self::MissingClaim("sub"),
            ErrorKind::MissingRequiredClaim(claim) if claim == "exp" => Self::MissingClaim("exp"),
            _ => Self::Malformed(e.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("empty HMAC secret")]
    EmptySecret,
    #[error("invalid ed25519 public key pem: {0}")]
    InvalidPem(jsonwebtoken::errors::Error),
}

/// Raw claims as they travel inside the token.
#[derive(Debug, Clone, Deserialize)]
struct TokenClaims {
    sub: String,
    exp: u64,
    #[serde(default)]
    iat: Option<u64>,
    // Issued as a string by the login service; older tokens carry a number.
    #[serde(default, rename = "userId")]
    user_id: Option<serde_json::Value>,
}

/// Claims that passed signature and expiry verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub subject: String,
    pub user_id: Option<String>,
    pub issued_at: Option<u64>,
    pub expires_at: u64,
}

/// Access-token verifier.
///
/// - The key is process-wide and immutable after construction, so the codec is shared via `Arc`.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenCodec {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: u64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(config: &TokenConfig) -> Result<Self, KeyError> {
        let (decoding_key, algorithm) = match &config.key {
            TokenKey::Hmac(secret) => {
                if secret.is_empty() {
                    return Err(KeyError::EmptySecret);
                }
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            TokenKey::Ed25519PublicPem(pem) => (
                DecodingKey::from_ed_pem(pem.as_bytes()).map_err(KeyError::InvalidPem)?,
                Algorithm::EdDSA,
            ),
        };

        // Only the configured algorithm is accepted.
        let mut validation = Validation::new(algorithm);
        validation.leeway = config.leeway_seconds;

        // jsonwebtoken only checks iss/aud when the token carries them; a configured
        // value makes the claim mandatory.
        let mut required = vec!["exp", "sub"];
        match &config.issuer {
            Some(issuer) => {
                validation.set_issuer(&[issuer]);
                required.push("iss");
            }
            None => validation.iss = None,
        }
        match &config.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);

        Ok(Self {
            decoding_key,
            validation,
            leeway_seconds: config.leeway_seconds,
        })
    }

    /// Verify the signature and expiry, then return the claims.
    ///
    /// `jsonwebtoken` treats `exp == now` as still valid; here the expiry must be
    /// strictly in the future (plus leeway).
    pub fn decode(&self, token: &str) -> Result<VerifiedClaims, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.exp.saturating_add(self.leeway_seconds) <= now_unix() {
            return Err(TokenError::Expired);
        }
        if claims.sub.trim().is_empty() {
            return Err(TokenError::MissingClaim("sub"));
        }

        Ok(VerifiedClaims {
            subject: claims.sub,
            user_id: claims.user_id.and_then(user_id_to_string),
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        Ok(self.decode(token)?.subject)
    }

    pub fn extract_user_id(&self, token: &str) -> Result<String, TokenError> {
        self.decode(token)?
            .user_id
            .ok_or(TokenError::MissingClaim("userId"))
    }

    /// True iff the signature verifies, the token is unexpired and its subject is `identity`'s.
    pub fn validate(&self, token: &str, identity: &Identity) -> bool {
        match self.decode(token) {
            Ok(claims) => claims.subject == identity.subject,
            Err(err) => {
                tracing::debug!(error = %err, token = %fingerprint(token), "token validation failed");
                false
            }
        }
    }
}

fn user_id_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn now_unix() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Short, non-reversible token id for logs. Raw tokens are never logged.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..9])
}
