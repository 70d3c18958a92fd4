//! Shared HTTP/JSON RPC plumbing for backend clients.

use std::time::{Duration, Instant};

use axum::http::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use url::Url;

use crate::backend::types::{Artifact, BackendError, Service};
use crate::observability::metrics;

/// Parse a configured backend address into a base URL.
///
/// Bare `host:port` addresses are treated as plain HTTP.
pub fn parse_base_url(address: &str) -> Result<Url, String> {
    let address = address.trim();
    if address.is_empty() {
        return Err("must not be empty".to_string());
    }

    let candidate = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    };

    let url = Url::parse(&candidate).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err("missing host".to_string());
    }
    Ok(url)
}

/// One backend's base URL plus a pooled HTTP client with a fixed timeout.
#[derive(Debug, Clone)]
pub struct RpcClient {
    service: Service,
    base: Url,
    http: Client,
    timeout: Duration,
}

impl RpcClient {
    pub fn new(service: Service, address: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base = parse_base_url(address).map_err(|message| BackendError::InvalidAddress {
            service,
            address: address.to_string(),
            message,
        })?;

        let http = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| BackendError::Transport {
                service,
                source: Box::new(e),
            })?;

        Ok(Self {
            service,
            base,
            http,
            timeout,
        })
    }

    pub fn service(&self) -> Service {
        self.service
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidAddress {
                service: self.service,
                address: self.base.to_string(),
                message: "cannot be a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn get(&self, segments: &[&str]) -> Result<RequestBuilder, BackendError> {
        Ok(self.http.get(self.endpoint(segments)?))
    }

    pub fn post(&self, segments: &[&str]) -> Result<RequestBuilder, BackendError> {
        Ok(self.http.post(self.endpoint(segments)?))
    }

    /// Send a request, recording its outcome under `operation`.
    pub async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, BackendError> {
        let start = Instant::now();
        let result = request.send().await.map_err(|e| self.map_error(e));

        let outcome = match &result {
            Ok(response) if response.status().is_server_error() => "error",
            Ok(_) => "ok",
            Err(e) => e.outcome(),
        };
        metrics::record_backend_call(self.service.as_str(), operation, outcome, start);

        result
    }

    /// Read a binary response body into an [`Artifact`].
    pub async fn read_artifact(&self, response: Response) -> Result<Artifact, BackendError> {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(|e| self.map_error(e))?;
        Ok(Artifact::new(bytes, content_type))
    }

    /// Decode a JSON response body.
    pub async fn read_json<T>(&self, response: Response) -> Result<T, BackendError>
    where
        T: serde::de::DeserializeOwned,
    {
        let bytes = response.bytes().await.map_err(|e| self.map_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Malformed {
            service: self.service,
            message: e.to_string(),
        })
    }

    /// Error for a status code outside the backend's contract.
    pub fn unexpected(&self, status: StatusCode) -> BackendError {
        BackendError::UnexpectedStatus {
            service: self.service,
            status: status.as_u16(),
        }
    }

    /// Treat any 2xx as reachable.
    pub async fn probe(&self) -> Result<(), BackendError> {
        let response = self.send("health", self.get(&["health"])?).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.unexpected(response.status()))
        }
    }

    fn map_error(&self, error: reqwest::Error) -> BackendError {
        if error.is_timeout() {
            BackendError::Timeout {
                service: self.service,
                timeout: self.timeout,
            }
        } else {
            BackendError::Transport {
                service: self.service,
                source: Box::new(error),
            }
        }
    }
}
