//! Shared utilities for integration testing.
//!
//! Mock backends are real axum servers on ephemeral ports speaking the same
//! HTTP/JSON contract as the production services.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use emojify_api::config::ApiConfig;
use emojify_api::http::HttpServer;
use emojify_api::lifecycle::{startup, Shutdown};

/// A tiny valid PNG signature followed by filler.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Recording stand-in for the emojify service.
#[derive(Default)]
pub struct MockEmojify {
    pub create_calls: AtomicUsize,
    pub jobs: Mutex<HashMap<String, Vec<u8>>>,
    pub created_urls: Mutex<Vec<String>>,
    pub delay: Mutex<Option<Duration>>,
}

impl MockEmojify {
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn finish_job(&self, id: &str, bytes: &[u8]) {
        self.jobs.lock().unwrap().insert(id.to_string(), bytes.to_vec());
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

async fn emojify_create(State(mock): State<Arc<MockEmojify>>, Json(body): Json<Value>) -> Response {
    mock.pause().await;
    let n = mock.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
    let url = body["url"].as_str().unwrap_or_default().to_string();
    mock.created_urls.lock().unwrap().push(url);
    Json(json!({ "id": format!("job-{}", n) })).into_response()
}

async fn emojify_job(State(mock): State<Arc<MockEmojify>>, Path(id): Path<String>) -> Response {
    mock.pause().await;
    match mock.jobs.lock().unwrap().get(&id) {
        Some(bytes) => (
            [(header::CONTENT_TYPE, "image/png")],
            Bytes::from(bytes.clone()),
        )
            .into_response(),
        None if id.starts_with("job-") => StatusCode::ACCEPTED.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn emojify_health(State(mock): State<Arc<MockEmojify>>) -> StatusCode {
    mock.pause().await;
    StatusCode::OK
}

/// Start a mock emojify service.
pub async fn start_emojify() -> (SocketAddr, Arc<MockEmojify>) {
    let mock = Arc::new(MockEmojify::default());
    let router = Router::new()
        .route("/create", post(emojify_create))
        .route("/jobs/{id}", get(emojify_job))
        .route("/health", get(emojify_health))
        .with_state(mock.clone());
    (serve(router).await, mock)
}

/// Recording stand-in for the cache service.
#[derive(Default)]
pub struct MockCache {
    pub exists_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    pub files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockCache {
    pub fn insert(&self, key: &str, bytes: &[u8]) {
        self.files.lock().unwrap().insert(key.to_string(), bytes.to_vec());
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

async fn cache_exists(State(mock): State<Arc<MockCache>>, Path(key): Path<String>) -> Json<Value> {
    mock.exists_calls.fetch_add(1, Ordering::SeqCst);
    let exists = mock.files.lock().unwrap().contains_key(&key);
    Json(json!({ "exists": exists }))
}

async fn cache_file(State(mock): State<Arc<MockCache>>, Path(key): Path<String>) -> Response {
    mock.get_calls.fetch_add(1, Ordering::SeqCst);
    match mock.files.lock().unwrap().get(&key) {
        Some(bytes) => Bytes::from(bytes.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Start a mock cache service.
pub async fn start_cache() -> (SocketAddr, Arc<MockCache>) {
    let mock = Arc::new(MockCache::default());
    let router = Router::new()
        .route("/exists/{key}", get(cache_exists))
        .route("/files/{key}", get(cache_file))
        .route("/health", get(|| async { StatusCode::OK }))
        .with_state(mock.clone());
    (serve(router).await, mock)
}

/// An address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Config pointing at the given backends with short timeouts.
pub fn config_for(emojify: SocketAddr, cache: SocketAddr) -> ApiConfig {
    let mut config = ApiConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.backends.emojify_address = format!("http://{}", emojify);
    config.backends.cache_address = format!("http://{}", cache);
    config.backends.timeout = Duration::from_millis(500);
    config.backends.health_timeout = Duration::from_millis(300);
    config
}

/// A running gateway.
pub struct Gateway {
    pub base: String,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(config: ApiConfig) -> Gateway {
    let state = startup::build_state(&config).unwrap();
    let mount = config.listener.mount_path.clone();
    let server = HttpServer::new(config, state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    Gateway {
        base: format!("http://{}{}", addr, mount),
        shutdown,
        handle,
    }
}

/// HTTP client for talking to the gateway in tests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
