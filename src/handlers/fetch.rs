//! `GET {mount}/{id}`: fetch the result of a submitted job.

use std::time::Instant;

use axum::extract::{Path, State};

use crate::backend::JobHandle;
use crate::handlers::{backend_failure, finish};
use crate::http::response::HandlerResult;
use crate::http::server::AppState;

pub async fn fetch_handler(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let start = Instant::now();
    let job = JobHandle::new(id);

    let result = match state.emojify.retrieve(&job).await {
        Ok(Some(artifact)) => HandlerResult::Ok {
            artifact,
            name: None,
        },
        Ok(None) => {
            tracing::debug!(job = %job, "Job not found or not ready");
            HandlerResult::NotFound
        }
        Err(e) => backend_failure("retrieve", e),
    };

    finish("fetch", result, start)
}
