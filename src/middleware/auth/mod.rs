pub mod access;
pub mod filter;
pub mod policy;
pub mod routes;
