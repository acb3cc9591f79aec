/*!
 * Request context extractor
 *
 * Responsibility:
 * - Hand the per-request RequestContext to handlers
 * - axum-facing code lives in core, the type itself in types
 *
 * Public API:
 * - RequestContext
 * - RequestCtxExtractor
 */

mod core;
mod types;

pub use self::core::RequestCtxExtractor;
pub use self::types::RequestContext;
