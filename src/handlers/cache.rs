//! `GET {mount}/cache/{file}`: serve a cached artifact.

use std::time::Instant;

use axum::extract::{Path, State};

use crate::backend::CacheKey;
use crate::handlers::{backend_failure, finish};
use crate::http::response::HandlerResult;
use crate::http::server::AppState;

pub async fn cache_handler(State(state): State<AppState>, Path(file): Path<String>) -> HandlerResult {
    let start = Instant::now();
    let key = CacheKey::new(file.as_str());

    let result = match state.cache.get(&key).await {
        Ok(Some(artifact)) => HandlerResult::Ok {
            artifact,
            name: Some(file),
        },
        Ok(None) => {
            tracing::debug!(key = %key, "Cache miss");
            HandlerResult::NotFound
        }
        Err(e) => backend_failure("get", e),
    };

    finish("cache", result, start)
}
