/*
 * Responsibility
 * - Read-only SQLx access to the credentials table
 * - Takes a PgPool and fetches one row by username
 * - DB errors are returned as RepoError
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct CredentialRow {
    pub username: String,
    pub password: String,
    pub role: String,
    pub is_enabled: bool,
    pub is_account_non_expired: bool,
    pub is_account_non_locked: bool,
    pub is_credentials_non_expired: bool,
}

pub async fn find_by_username(
    db: &PgPool,
    username: &str,
) -> Result<Option<CredentialRow>, RepoError> {
    let row = sqlx::query_as::<_, CredentialRow>(
        r#"
        SELECT username, password, role,
               is_enabled, is_account_non_expired,
               is_account_non_locked, is_credentials_non_expired
        FROM credentials
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
