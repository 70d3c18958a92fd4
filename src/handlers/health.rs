//! `GET {mount}/health`: readiness of both backends.

use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::backend::{BackendError, Service};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::resilience::timeouts::with_deadline;

/// Probe both backends concurrently, each within the health timeout.
pub async fn health_handler(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let limit = state.health_timeout;

    let (emojify, cache) = tokio::join!(
        with_deadline(Service::Emojify, limit, state.emojify.check()),
        with_deadline(Service::Cache, limit, state.cache.check()),
    );

    let failures: Vec<BackendError> = [emojify.err(), cache.err()].into_iter().flatten().collect();

    let (status, body) = if failures.is_empty() {
        (StatusCode::OK, "OK\n".to_string())
    } else {
        for failure in &failures {
            tracing::warn!(service = %failure.service(), error = %failure, "Health check failed");
        }
        let body: String = failures
            .iter()
            .map(|f| format!("{}: {}\n", f.service(), f.summary()))
            .collect();
        (StatusCode::SERVICE_UNAVAILABLE, body)
    };

    metrics::record_request("health", status.as_u16(), start);
    (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}
