/// Factory: build the identity store from application `Config`.
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::error::AppError;
use crate::services::identity::{IdentityStore, InMemoryIdentityStore, PgIdentityStore};

pub fn build_identity_store(config: &Config) -> Result<Arc<dyn IdentityStore>, AppError> {
    match &config.database_url {
        Some(url) => {
            // Lazy pool: an unreachable database shows up per request as 503, not as a boot failure.
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect_lazy(url)
                .map_err(|e| {
                    tracing::error!(error = %e, "invalid DATABASE_URL");
                    AppError::Internal
                })?;
            Ok(Arc::new(PgIdentityStore::new(pool)))
        }
        None => {
            let store = InMemoryIdentityStore::from_seed(config.dev_users.as_deref().unwrap_or(""))
                .map_err(|e| {
                    tracing::error!(error = %e, "invalid GATEWAY_DEV_USERS");
                    AppError::Internal
                })?;
            tracing::warn!(
                users = store.len(),
                "DATABASE_URL not set; using in-memory identity store"
            );
            Ok(Arc::new(store))
        }
    }
}
