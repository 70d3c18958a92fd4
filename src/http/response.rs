//! Handler outcomes and their HTTP mapping.
//!
//! # Responsibilities
//! - Capture what a handler decided before anything is written
//! - Map backend errors to 502/503 with a short, stable body
//! - Never leak addresses or error chains to callers
//!
//! # Design Decisions
//! - Timeouts surface as 503 Service Unavailable
//! - Every other backend failure surfaces as 502 Bad Gateway

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::backend::{Artifact, BackendError, JobHandle};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// What a handler decided to answer.
#[derive(Debug)]
pub enum HandlerResult {
    /// Input rejected; the reason is written back verbatim.
    BadRequest(String),
    /// The artifact is already in the cache.
    NotModified,
    /// Processing started; the body identifies the job.
    Accepted(JobHandle),
    NotFound,
    /// A backend failed or timed out.
    ServiceUnavailable(BackendError),
    /// Binary content plus the name used to infer its type.
    Ok {
        artifact: Artifact,
        name: Option<String>,
    },
}

impl HandlerResult {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerResult::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerResult::NotModified => StatusCode::NOT_MODIFIED,
            HandlerResult::Accepted(_) => StatusCode::ACCEPTED,
            HandlerResult::NotFound => StatusCode::NOT_FOUND,
            HandlerResult::ServiceUnavailable(err) if err.is_timeout() => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            HandlerResult::ServiceUnavailable(_) => StatusCode::BAD_GATEWAY,
            HandlerResult::Ok { .. } => StatusCode::OK,
        }
    }
}

fn text(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

impl IntoResponse for HandlerResult {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            HandlerResult::BadRequest(reason) => text(status, format!("{}\n", reason)),
            HandlerResult::NotModified => status.into_response(),
            HandlerResult::Accepted(job) => text(status, job.to_string()),
            HandlerResult::NotFound => text(status, "Not Found\n".to_string()),
            HandlerResult::ServiceUnavailable(err) => {
                let what = if err.is_timeout() { "unavailable" } else { "error" };
                text(status, format!("{} service {}\n", err.service(), what))
            }
            HandlerResult::Ok { artifact, name } => {
                let content_type = artifact.resolved_content_type(name.as_deref());
                (
                    status,
                    [(header::CONTENT_TYPE, content_type)],
                    Body::from(artifact.bytes),
                )
                    .into_response()
            }
        }
    }
}
