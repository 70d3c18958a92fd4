//! Request handlers.
//!
//! # Data Flow
//! ```text
//! POST {mount}/             → submit.rs  (validate → cache.exists → emojify.create)
//! GET  {mount}/{id}         → fetch.rs   (emojify.retrieve)
//! GET  {mount}/cache/{file} → cache.rs   (cache.get)
//! GET  {mount}/health       → health.rs  (emojify.check + cache.check)
//! ```
//!
//! # Design Decisions
//! - Handlers compute a `HandlerResult` first, then convert it to a response
//! - Backend errors are logged here, at the boundary, and never retried
//! - No single-flight: identical concurrent submissions each reach the backend

use std::time::Instant;

use crate::backend::BackendError;
use crate::http::response::HandlerResult;
use crate::observability::metrics;

pub mod cache;
pub mod fetch;
pub mod health;
pub mod submit;

pub use cache::cache_handler;
pub use fetch::fetch_handler;
pub use health::health_handler;
pub use submit::submit_handler;

/// Log a failed backend call and turn it into a 5xx outcome.
fn backend_failure(operation: &'static str, error: BackendError) -> HandlerResult {
    tracing::error!(
        service = %error.service(),
        operation,
        error = %error,
        "Backend call failed"
    );
    HandlerResult::ServiceUnavailable(error)
}

fn finish(handler: &'static str, result: HandlerResult, start: Instant) -> HandlerResult {
    metrics::record_request(handler, result.status().as_u16(), start);
    result
}
