//! Timeout enforcement.
//!
//! Backend clients carry their own request timeout. This helper bounds
//! composite waits, such as the health probes, with a separate deadline.

use std::future::Future;
use std::time::Duration;

use crate::backend::{BackendError, Service};

/// Run `call`, failing with [`BackendError::Timeout`] once `limit` elapses.
pub async fn with_deadline<T, F>(service: Service, limit: Duration, call: F) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, BackendError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout {
            service,
            timeout: limit,
        }),
    }
}
