//! End-to-end tests: real gateway, real mock backends, real sockets.

use std::time::Duration;

use reqwest::StatusCode;

use emojify_api::backend::CacheKey;
use emojify_api::http::validation::SubmittedUrl;

mod common;

use common::{client, config_for, dead_address, start_cache, start_emojify, start_gateway, PNG_BYTES};

const IMAGE_URL: &str = "https://example.com/images/cat.png";

fn key_for(url: &str) -> String {
    CacheKey::for_url(&SubmittedUrl::parse(url).unwrap()).to_string()
}

#[tokio::test]
async fn test_submit_then_fetch() {
    let (emojify_addr, emojify) = start_emojify().await;
    let (cache_addr, _cache) = start_cache().await;
    let gateway = start_gateway(config_for(emojify_addr, cache_addr)).await;
    let http = client();

    let res = http.post(&gateway.base).body(IMAGE_URL).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let job = res.text().await.unwrap();
    assert_eq!(job, "job-1");
    assert_eq!(emojify.created_urls.lock().unwrap().as_slice(), [IMAGE_URL]);

    // Still processing
    let res = http.get(format!("{}{}", gateway.base, job)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "Not Found\n");

    emojify.finish_job(&job, PNG_BYTES);
    let res = http.get(format!("{}{}", gateway.base, job)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "image/png");
    assert_eq!(&res.bytes().await.unwrap()[..], PNG_BYTES);

    gateway.shutdown.trigger();
    gateway.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_cached_url_is_not_resubmitted() {
    let (emojify_addr, emojify) = start_emojify().await;
    let (cache_addr, cache) = start_cache().await;
    cache.insert(&key_for(IMAGE_URL), PNG_BYTES);
    let gateway = start_gateway(config_for(emojify_addr, cache_addr)).await;
    let http = client();

    let res = http.post(&gateway.base).body(IMAGE_URL).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(emojify.create_calls(), 0);

    let res = http
        .get(format!("{}cache/{}", gateway.base, key_for(IMAGE_URL)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "image/png");
    assert_eq!(&res.bytes().await.unwrap()[..], PNG_BYTES);
}

#[tokio::test]
async fn test_invalid_url_rejected_without_backend_calls() {
    let (emojify_addr, emojify) = start_emojify().await;
    let (cache_addr, cache) = start_cache().await;
    let gateway = start_gateway(config_for(emojify_addr, cache_addr)).await;

    let res = client().post(&gateway.base).body("httsddfdfdf/cc").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap(), "httsddfdfdf/cc is not a valid URL\n");
    assert_eq!(emojify.create_calls(), 0);
    assert_eq!(cache.exists_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cache_miss_is_not_found() {
    let (emojify_addr, _emojify) = start_emojify().await;
    let (cache_addr, _cache) = start_cache().await;
    let gateway = start_gateway(config_for(emojify_addr, cache_addr)).await;

    let res = client().get(format!("{}cache/missing", gateway.base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_down_backend() {
    let (emojify_addr, _emojify) = start_emojify().await;
    let (cache_addr, _cache) = start_cache().await;
    let gateway = start_gateway(config_for(emojify_addr, cache_addr)).await;

    let res = client().get(format!("{}health", gateway.base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "OK\n");

    let gateway = start_gateway(config_for(emojify_addr, dead_address().await)).await;
    let res = client().get(format!("{}health", gateway.base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(res.text().await.unwrap().starts_with("cache: "));
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    let (cache_addr, _cache) = start_cache().await;
    let gateway = start_gateway(config_for(dead_address().await, cache_addr)).await;

    let res = client().post(&gateway.base).body(IMAGE_URL).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(res.text().await.unwrap(), "emojify service error\n");
}

#[tokio::test]
async fn test_mount_path_prefixes_every_route() {
    let (emojify_addr, _emojify) = start_emojify().await;
    let (cache_addr, _cache) = start_cache().await;
    let mut config = config_for(emojify_addr, cache_addr);
    config.listener.mount_path = "/api/".to_string();
    let gateway = start_gateway(config).await;
    assert!(gateway.base.ends_with("/api/"));

    let res = client().post(&gateway.base).body(IMAGE_URL).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let root = gateway.base.trim_end_matches("api/");
    let res = client().get(format!("{}health", root)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_identical_concurrent_submissions_each_reach_backend() {
    let (emojify_addr, emojify) = start_emojify().await;
    let (cache_addr, _cache) = start_cache().await;
    emojify.set_delay(Duration::from_millis(50));
    let gateway = start_gateway(config_for(emojify_addr, cache_addr)).await;
    let http = client();

    let requests = (0..20).map(|_| {
        let http = http.clone();
        let base = gateway.base.clone();
        tokio::spawn(async move { http.post(base).body(IMAGE_URL).send().await.unwrap().status() })
    });
    for handle in requests.collect::<Vec<_>>() {
        assert_eq!(handle.await.unwrap(), StatusCode::ACCEPTED);
    }

    assert_eq!(emojify.create_calls(), 20);
}
