/*
 * Responsibility
 * - Read gateway settings from the environment (.env supported via dotenvy)
 * - Validate them once at startup (missing/invalid values abort the boot)
 * - Nothing here is read per request
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Key material used to verify access tokens.
///
/// Exactly one scheme is active per process. Debug output never contains the key.
#[derive(Clone)]
pub enum TokenKey {
    /// HS256 shared secret.
    Hmac(String),
    /// EdDSA (Ed25519) public key, PEM encoded.
    Ed25519PublicPem(String),
}

impl std::fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hmac(_) => f.write_str("TokenKey::Hmac(..)"),
            Self::Ed25519PublicPem(_) => f.write_str("TokenKey::Ed25519PublicPem(..)"),
        }
    }
}

/// Settings for access-token verification.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub key: TokenKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// Static CORS policy, consumed once when the router is built.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub app_env: AppEnv,
    pub allowed_origins: Vec<String>,
    pub max_age: Duration,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            app_env: AppEnv::Development,
            allowed_origins: Vec::new(),
            max_age: Duration::from_secs(3600),
        }
    }
}

/// Transport limits applied to every request.
#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    pub body_limit_bytes: usize,
    pub timeout: Duration,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Prefix the upstream API gateway puts in front of every business route.
    pub path_prefix: String,

    pub token: TokenConfig,

    // None => in-memory identity store seeded from `dev_users`
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub dev_users: Option<String>,

    pub cors: CorsConfig,
    pub http: HttpLimits,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let path_prefix = normalize_prefix(
            &std::env::var("GATEWAY_PATH_PREFIX").unwrap_or_else(|_| "/app".to_string()),
        );

        let key = token_key_from_env()?;

        let issuer = non_empty_var("AUTH_ISSUER");
        let audience = non_empty_var("AUTH_AUDIENCE");

        let leeway_seconds = match std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
            Err(_) => 0,
        };

        let database_url = non_empty_var("DATABASE_URL");

        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let dev_users = non_empty_var("GATEWAY_DEV_USERS");

        if app_env.is_production() && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let allowed_origins = parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let max_age = std::env::var("CORS_MAX_AGE_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(3600));

        let defaults = HttpLimits::default();
        let http = HttpLimits {
            body_limit_bytes: std::env::var("REQUEST_BODY_LIMIT_BYTES")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.body_limit_bytes),
            timeout: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        };

        Ok(Self {
            addr,
            app_env,
            path_prefix,
            token: TokenConfig {
                key,
                issuer,
                audience,
                leeway_seconds,
            },
            database_url,
            database_max_connections,
            dev_users,
            cors: CorsConfig {
                app_env,
                allowed_origins,
                max_age,
            },
            http,
        })
    }
}

fn token_key_from_env() -> Result<TokenKey, ConfigError> {
    if let Some(pem) = non_empty_var("ACCESS_JWT_PUBLIC_KEY_PEM") {
        return Ok(TokenKey::Ed25519PublicPem(pem.replace("\\n", "\n")));
    }

    match non_empty_var("JWT_SECRET") {
        Some(secret) => {
            if secret.len() < 32 {
                tracing::warn!("JWT_SECRET is shorter than 32 bytes");
            }
            Ok(TokenKey::Hmac(secret))
        }
        None => Err(ConfigError::Missing("JWT_SECRET")),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `"/app/"` -> `"/app"`, `"app"` -> `"/app"`, `""` or `"/"` -> `""`.
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix("/app"), "/app");
        assert_eq!(normalize_prefix("/app/"), "/app");
        assert_eq!(normalize_prefix("app"), "/app");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }

    #[test]
    fn origins_skip_blanks() {
        assert_eq!(
            parse_origins(" https://a.example , ,https://b.example"),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn app_env_accepts_short_form() {
        assert_eq!(AppEnv::parse("PROD"), AppEnv::Production);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Development);
    }

    #[test]
    fn token_key_debug_hides_material() {
        let key = TokenKey::Hmac("super-secret".to_string());
        assert!(!format!("{key:?}").contains("super-secret"));
    }
}
