//! Backend-facing types and error definitions.

use std::fmt;
use std::time::Duration;

use axum::body::Bytes;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::http::validation::SubmittedUrl;

/// The remote services this gateway depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Emojify,
    Cache,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Emojify => "emojify",
            Service::Cache => "cache",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier for an artifact held by the cache service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive the key under which the emojified version of `url` is stored:
    /// the lowercase hex SHA-256 of the serialized URL.
    pub fn for_url(url: &SubmittedUrl) -> Self {
        let digest = Sha256::digest(url.as_str().as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle for a conversion job owned by the emojify service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binary content returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

impl Artifact {
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    /// Content type to serve this artifact with.
    ///
    /// Prefers a specific type reported by the backend, then sniffs the
    /// payload, then looks at the extension of `name`.
    pub fn resolved_content_type(&self, name: Option<&str>) -> String {
        let reported = self
            .content_type
            .as_deref()
            .filter(|ct| !ct.is_empty() && !ct.starts_with("application/octet-stream"));
        if let Some(ct) = reported {
            return ct.to_string();
        }
        sniff_image_type(&self.bytes)
            .or_else(|| name.and_then(type_from_extension))
            .unwrap_or("application/octet-stream")
            .to_string()
    }
}

fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

fn type_from_extension(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Errors that can occur while calling a backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The call did not complete within its deadline.
    #[error("{service} call timed out after {timeout:?}")]
    Timeout { service: Service, timeout: Duration },

    /// Connection or protocol failure.
    #[error("{service} call failed: {source}")]
    Transport {
        service: Service,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The backend answered with a status outside its contract.
    #[error("{service} returned unexpected status {status}")]
    UnexpectedStatus { service: Service, status: u16 },

    /// The backend answered with a body we could not understand.
    #[error("{service} returned a malformed response: {message}")]
    Malformed { service: Service, message: String },

    /// The configured address cannot be used as a base URL.
    #[error("invalid {service} address '{address}': {message}")]
    InvalidAddress {
        service: Service,
        address: String,
        message: String,
    },
}

impl BackendError {
    pub fn service(&self) -> Service {
        match self {
            BackendError::Timeout { service, .. }
            | BackendError::Transport { service, .. }
            | BackendError::UnexpectedStatus { service, .. }
            | BackendError::Malformed { service, .. }
            | BackendError::InvalidAddress { service, .. } => *service,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Timeout { .. })
    }

    /// Short description safe to show to API callers.
    pub fn summary(&self) -> String {
        match self {
            BackendError::Timeout { .. } => "timed out".to_string(),
            BackendError::Transport { .. } => "unreachable".to_string(),
            BackendError::UnexpectedStatus { status, .. } => format!("unexpected status {}", status),
            BackendError::Malformed { .. } => "malformed response".to_string(),
            BackendError::InvalidAddress { .. } => "misconfigured".to_string(),
        }
    }

    /// Metric label for this failure.
    pub fn outcome(&self) -> &'static str {
        if self.is_timeout() {
            "timeout"
        } else {
            "error"
        }
    }
}
