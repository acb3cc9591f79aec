/*
 * Responsibility
 * - The gateway's own HTTP surface (actuator + session check)
 * - routes() re-export
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
