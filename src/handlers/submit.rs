//! `POST {mount}/`: submit an image URL for emojification.

use std::time::Instant;

use axum::{body::Bytes, extract::State};

use crate::backend::CacheKey;
use crate::handlers::{backend_failure, finish};
use crate::http::response::HandlerResult;
use crate::http::server::AppState;
use crate::http::validation::SubmittedUrl;

/// The whole body is the URL as plain text.
pub async fn submit_handler(State(state): State<AppState>, body: Bytes) -> HandlerResult {
    let start = Instant::now();
    let result = submit(&state, &body).await;
    finish("submit", result, start)
}

async fn submit(state: &AppState, body: &[u8]) -> HandlerResult {
    let raw = String::from_utf8_lossy(body);
    let url = match SubmittedUrl::parse(&raw) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(input = %e.input, "Rejected submission");
            return HandlerResult::BadRequest(e.to_string());
        }
    };

    let key = CacheKey::for_url(&url);
    match state.cache.exists(&key).await {
        Ok(true) => {
            tracing::debug!(url = %url, key = %key, "Already cached");
            return HandlerResult::NotModified;
        }
        Ok(false) => {}
        Err(e) => return backend_failure("exists", e),
    }

    match state.emojify.create(&url).await {
        Ok(job) => {
            tracing::info!(url = %url, key = %key, job = %job, "Emojify job created");
            HandlerResult::Accepted(job)
        }
        Err(e) => backend_failure("create", e),
    }
}
