/*
 * Responsibility
 * - Identity / Role types shared by the filter, policy and handlers
 * - IdentityStore: read-only lookup of an account by login name
 * - Backends: PostgreSQL (credentials table) and in-memory (dev/tests)
 */
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod factory;
pub mod memory;
pub mod postgres;

pub use factory::build_identity_store;
pub use memory::InMemoryIdentityStore;
pub use postgres::PgIdentityStore;

/// Closed authority set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts both `ROLE_USER` and `USER` spellings, case-insensitively.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownRole(raw.to_string())),
        }
    }
}

/// Account record backing an authenticated subject.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    credential: Option<String>,
    pub roles: BTreeSet<Role>,
    pub account_enabled: bool,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // credential is never printed
        f.debug_struct("Identity")
            .field("subject", &self.subject)
            .field("roles", &self.roles)
            .field("account_enabled", &self.account_enabled)
            .field("account_non_expired", &self.account_non_expired)
            .field("account_non_locked", &self.account_non_locked)
            .field("credentials_non_expired", &self.credentials_non_expired)
            .finish()
    }
}

impl Identity {
    /// An enabled account with the given roles and no stored credential.
    pub fn new(subject: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            subject: subject.into(),
            credential: None,
            roles: roles.into_iter().collect(),
            account_enabled: true,
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.roles.contains(r))
    }

    /// All four account flags allow the account to be used.
    pub fn is_usable(&self) -> bool {
        self.account_enabled
            && self.account_non_expired
            && self.account_non_locked
            && self.credentials_non_expired
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity not found")]
    NotFound,
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only identity lookup.
///
/// Implementations must be safe to call concurrently and must not write.
#[async_trait]
pub trait IdentityStore: Send + Sync + 'static {
    // Backend name for logs.
    fn backend_name(&self) -> &'static str;

    async fn load_by_subject(&self, subject: &str) -> Result<Identity, IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_both_spellings() {
        assert_eq!("ROLE_USER".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("role_admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("ROLE_ROOT".parse::<Role>().is_err());
    }

    #[test]
    fn membership_is_explicit() {
        let identity = Identity::new("alice", [Role::User]);
        assert!(identity.has_role(Role::User));
        assert!(!identity.has_role(Role::Admin));
        assert!(identity.has_any_role(&[Role::Admin, Role::User]));
        assert!(!identity.has_any_role(&[]));
    }

    #[test]
    fn locked_account_is_not_usable() {
        let mut identity = Identity::new("alice", [Role::User]);
        assert!(identity.is_usable());
        identity.account_non_locked = false;
        assert!(!identity.is_usable());
    }

    #[test]
    fn debug_hides_credential() {
        let identity = Identity::new("alice", [Role::User]).with_credential("$2a$10$hash");
        assert_eq!(identity.credential(), Some("$2a$10$hash"));
        assert!(!format!("{identity:?}").contains("$2a$10$hash"));
    }
}
