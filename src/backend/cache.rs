//! HTTP client for the cache service.
//!
//! # Contract
//! - `GET /exists/{key}` → `{"exists": bool}`
//! - `GET /files/{key}` → 200 with stored bytes, 404 on miss
//! - `GET /health` → any 2xx when reachable

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::backend::client::RpcClient;
use crate::backend::types::{Artifact, BackendError, CacheKey, Service};
use crate::backend::CacheService;

#[derive(Deserialize)]
struct ExistsResponse {
    exists: bool,
}

/// Production [`CacheService`] speaking HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpCacheClient {
    rpc: RpcClient,
}

impl HttpCacheClient {
    pub fn new(address: &str, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            rpc: RpcClient::new(Service::Cache, address, timeout)?,
        })
    }
}

#[async_trait]
impl CacheService for HttpCacheClient {
    async fn exists(&self, key: &CacheKey) -> Result<bool, BackendError> {
        let request = self.rpc.get(&["exists", key.as_str()])?;
        let response = self.rpc.send("exists", request).await?;

        if !response.status().is_success() {
            return Err(self.rpc.unexpected(response.status()));
        }
        let body: ExistsResponse = self.rpc.read_json(response).await?;
        Ok(body.exists)
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<Artifact>, BackendError> {
        let request = self.rpc.get(&["files", key.as_str()])?;
        let response = self.rpc.send("get", request).await?;

        match response.status() {
            StatusCode::OK => Ok(Some(self.rpc.read_artifact(response).await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(self.rpc.unexpected(status)),
        }
    }

    async fn check(&self) -> Result<(), BackendError> {
        self.rpc.probe().await
    }
}
