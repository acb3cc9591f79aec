pub mod credential_repo;
pub mod error;
