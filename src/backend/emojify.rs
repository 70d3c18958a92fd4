//! HTTP client for the emojify service.
//!
//! # Contract
//! - `POST /create {"url": ...}` → `{"id": ...}`
//! - `GET /jobs/{id}` → 200 with image bytes, 202 while processing, 404 if unknown
//! - `GET /health` → any 2xx when reachable

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::backend::client::RpcClient;
use crate::backend::types::{Artifact, BackendError, JobHandle, Service};
use crate::backend::EmojifyService;
use crate::http::validation::SubmittedUrl;

#[derive(Serialize)]
struct CreateRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct CreateResponse {
    id: String,
}

/// Production [`EmojifyService`] speaking HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpEmojifyClient {
    rpc: RpcClient,
}

impl HttpEmojifyClient {
    pub fn new(address: &str, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            rpc: RpcClient::new(Service::Emojify, address, timeout)?,
        })
    }
}

#[async_trait]
impl EmojifyService for HttpEmojifyClient {
    async fn create(&self, url: &SubmittedUrl) -> Result<JobHandle, BackendError> {
        let request = self.rpc.post(&["create"])?.json(&CreateRequest { url: url.as_str() });
        let response = self.rpc.send("create", request).await?;

        if !response.status().is_success() {
            return Err(self.rpc.unexpected(response.status()));
        }

        let body: CreateResponse = self.rpc.read_json(response).await?;
        if body.id.trim().is_empty() {
            return Err(BackendError::Malformed {
                service: Service::Emojify,
                message: "empty job id".to_string(),
            });
        }
        Ok(JobHandle::new(body.id))
    }

    async fn retrieve(&self, job: &JobHandle) -> Result<Option<Artifact>, BackendError> {
        let request = self.rpc.get(&["jobs", job.as_str()])?;
        let response = self.rpc.send("retrieve", request).await?;

        match response.status() {
            StatusCode::OK => Ok(Some(self.rpc.read_artifact(response).await?)),
            // Not finished yet looks the same as unknown to callers
            StatusCode::ACCEPTED | StatusCode::NOT_FOUND => Ok(None),
            status => Err(self.rpc.unexpected(status)),
        }
    }

    async fn check(&self) -> Result<(), BackendError> {
        self.rpc.probe().await
    }
}
