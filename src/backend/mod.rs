//! Backend service clients.
//!
//! # Data Flow
//! ```text
//! handler
//!     → EmojifyService / CacheService (trait objects in AppState)
//!     → HttpEmojifyClient / HttpCacheClient (production, client.rs plumbing)
//!     → remote service over HTTP/JSON
//! ```
//!
//! # Design Decisions
//! - One capability trait per backend, chosen at construction time
//! - Clients are created once at startup and shared behind `Arc`
//! - Every call is bounded by the client timeout; timeouts are errors
//! - Nothing here retries; callers turn failures into responses

use async_trait::async_trait;

pub mod cache;
pub mod client;
pub mod emojify;
pub mod types;

#[cfg(test)]
pub(crate) mod memory;

pub use cache::HttpCacheClient;
pub use emojify::HttpEmojifyClient;
pub use types::{Artifact, BackendError, CacheKey, JobHandle, Service};

use crate::http::validation::SubmittedUrl;

/// The image-processing backend.
#[async_trait]
pub trait EmojifyService: Send + Sync + 'static {
    /// Start converting the image at `url`.
    async fn create(&self, url: &SubmittedUrl) -> Result<JobHandle, BackendError>;

    /// Fetch a finished job. `None` while the job is unknown or still running.
    async fn retrieve(&self, job: &JobHandle) -> Result<Option<Artifact>, BackendError>;

    /// Cheap reachability check.
    async fn check(&self) -> Result<(), BackendError>;
}

/// The store of previously emojified images.
#[async_trait]
pub trait CacheService: Send + Sync + 'static {
    async fn exists(&self, key: &CacheKey) -> Result<bool, BackendError>;

    async fn get(&self, key: &CacheKey) -> Result<Option<Artifact>, BackendError>;

    /// Cheap reachability check.
    async fn check(&self) -> Result<(), BackendError>;
}
