//! PostgreSQL-backed identity store (credentials table).
use async_trait::async_trait;
use sqlx::PgPool;

use super::{Identity, IdentityError, IdentityStore, Role};
use crate::repos::{credential_repo, credential_repo::CredentialRow, error::RepoError};

#[derive(Clone, Debug)]
pub struct PgIdentityStore {
    db: PgPool,
}

impl PgIdentityStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn load_by_subject(&self, subject: &str) -> Result<Identity, IdentityError> {
        let row = credential_repo::find_by_username(&self.db, subject)
            .await
            .map_err(|e| match e {
                RepoError::Db(err) => IdentityError::Unavailable(err.to_string()),
            })?
            .ok_or(IdentityError::NotFound)?;

        Ok(identity_from_row(row))
    }
}

fn identity_from_row(row: CredentialRow) -> Identity {
    let roles = match row.role.parse::<Role>() {
        Ok(role) => vec![role],
        Err(err) => {
            // An account with an unknown role can authenticate but holds no authority.
            tracing::warn!(username = %row.username, error = %err, "ignoring unknown role");
            Vec::new()
        }
    };

    let mut identity = Identity::new(row.username, roles).with_credential(row.password);
    identity.account_enabled = row.is_enabled;
    identity.account_non_expired = row.is_account_non_expired;
    identity.account_non_locked = row.is_account_non_locked;
    identity.credentials_non_expired = row.is_credentials_non_expired;
    identity
}
