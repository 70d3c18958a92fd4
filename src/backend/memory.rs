//! In-memory backends that record calls, for handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::types::{Artifact, BackendError, CacheKey, JobHandle, Service};
use crate::backend::{CacheService, EmojifyService};
use crate::http::validation::SubmittedUrl;

fn unavailable(service: Service) -> BackendError {
    BackendError::Transport {
        service,
        source: "connection refused".into(),
    }
}

#[derive(Default)]
pub struct MemoryEmojify {
    jobs: HashMap<String, Artifact>,
    failing: bool,
    create_calls: AtomicUsize,
    created: Mutex<Vec<String>>,
}

impl MemoryEmojify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job(mut self, id: &str, artifact: Artifact) -> Self {
        self.jobs.insert(id.to_string(), artifact);
        self
    }

    /// Every call fails as if the service were down.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn created_urls(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmojifyService for MemoryEmojify {
    async fn create(&self, url: &SubmittedUrl) -> Result<JobHandle, BackendError> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing {
            return Err(unavailable(Service::Emojify));
        }
        self.created.lock().unwrap().push(url.to_string());
        Ok(JobHandle::new(format!("job-{}", n)))
    }

    async fn retrieve(&self, job: &JobHandle) -> Result<Option<Artifact>, BackendError> {
        if self.failing {
            return Err(unavailable(Service::Emojify));
        }
        Ok(self.jobs.get(job.as_str()).cloned())
    }

    async fn check(&self) -> Result<(), BackendError> {
        if self.failing {
            return Err(unavailable(Service::Emojify));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCache {
    entries: HashMap<CacheKey, Artifact>,
    failing: bool,
    stall: Option<Duration>,
    exists_calls: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: CacheKey, artifact: Artifact) -> Self {
        self.entries.insert(key, artifact);
        self
    }

    /// Every call fails as if the service were down.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Health checks hang for `delay` before answering.
    pub fn stalled(mut self, delay: Duration) -> Self {
        self.stall = Some(delay);
        self
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn exists(&self, key: &CacheKey) -> Result<bool, BackendError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(unavailable(Service::Cache));
        }
        Ok(self.entries.contains_key(key))
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<Artifact>, BackendError> {
        if self.failing {
            return Err(unavailable(Service::Cache));
        }
        Ok(self.entries.get(key).cloned())
    }

    async fn check(&self) -> Result<(), BackendError> {
        if let Some(delay) = self.stall {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(unavailable(Service::Cache));
        }
        Ok(())
    }
}
