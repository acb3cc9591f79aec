/*
 * Responsibility
 * - Public interface of the middleware layers
 * - auth (access pipeline), cors, http plumbing, security headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
