//! In-memory identity store for development and tests.
use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use super::{Identity, IdentityError, IdentityStore, Role};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("invalid user entry: {0}")]
    InvalidEntry(String),
    #[error("unknown role in entry: {0}")]
    UnknownRole(String),
}

/// Immutable after construction; lookups need no lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    identities: HashMap<String, Identity>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identities.insert(identity.subject.clone(), identity);
        self
    }

    /// Parse `name:ROLE[|ROLE],...`, e.g. `alice:ADMIN|USER,bob:USER`.
    pub fn from_seed(seed: &str) -> Result<Self, SeedError> {
        let mut store = Self::new();

        for entry in seed.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, roles) = entry
                .split_once(':')
                .ok_or_else(|| SeedError::InvalidEntry(entry.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(SeedError::InvalidEntry(entry.to_string()));
            }

            let roles = roles
                .split('|')
                .map(|r| r.parse::<Role>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| SeedError::UnknownRole(entry.to_string()))?;

            store = store.with_identity(Identity::new(name, roles));
        }

        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn load_by_subject(&self, subject: &str) -> Result<Identity, IdentityError> {
        self.identities
            .get(subject)
            .cloned()
            .ok_or(IdentityError::NotFound)
    }
}
