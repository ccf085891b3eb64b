//! Unit tests for the request pipeline

use super::*;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use gallery_core::error::NetworkFailure;
use gallery_core::ArtworkResponse;
use serde_json::json;
use tokio::time::Instant;

use crate::transport::TransportResponse;

type Reply = Result<TransportResponse, NetworkFailure>;

/// Transport double that replays scripted replies, then repeats a fallback
struct StubTransport {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    calls: AtomicU32,
    seen_attempts: Mutex<Vec<u32>>,
}

impl StubTransport {
    fn always(reply: Reply) -> Arc<Self> {
        Self::scripted(Vec::new(), reply)
    }

    fn scripted(script: Vec<Reply>, fallback: Reply) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicU32::new(0),
            seen_attempts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn seen_attempts(&self) -> Vec<u32> {
        self.seen_attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> Result<TransportResponse, NetworkFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_attempts.lock().unwrap().push(request.attempt_count);
        let next = self.script.lock().unwrap().pop_front();
        // Suspend like real I/O so concurrent calls interleave
        tokio::task::yield_now().await;
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

fn ok(body: Value) -> Reply {
    Ok(TransportResponse::new(200, body.to_string()))
}

fn offline() -> Reply {
    Err(NetworkFailure::connect("connection refused"))
}

fn pipeline_for(transport: &Arc<StubTransport>) -> RequestPipeline {
    RequestPipeline::new(transport.clone(), PipelineConfig::default())
}

fn page_params(page: u32) -> Params {
    let mut params = Params::new();
    params.insert("page".to_string(), Value::from(page));
    params.insert("limit".to_string(), Value::from(10));
    params
}

fn artworks_body(page: u32) -> Value {
    json!({
        "data": [{ "id": page, "title": format!("Artwork {}", page) }],
        "pagination": { "current_page": page, "total_pages": 5 }
    })
}

#[test]
fn test_pipeline_config_default() {
    let config = PipelineConfig::default();
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.retry_delay, Duration::from_millis(1000));
    assert_eq!(config.cache_ttl, Duration::from_millis(300_000));
    assert_eq!(config.default_timeout, Duration::from_millis(10_000));
}

#[tokio::test(start_paused = true)]
async fn test_cache_hit_avoids_dispatch() {
    let transport = StubTransport::always(ok(artworks_body(1)));
    let pipeline = pipeline_for(&transport);

    let first = pipeline.get("/artworks/search", page_params(1)).await.unwrap();
    let second = pipeline.get("/artworks/search", page_params(1)).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert!(!first.is_cache_hit());
    assert!(second.is_cache_hit());
    assert_eq!(first.payload(), second.payload());
}

#[tokio::test(start_paused = true)]
async fn test_cache_expiry_dispatches_again() {
    let transport = StubTransport::always(ok(artworks_body(1)));
    let pipeline = pipeline_for(&transport);

    pipeline.get("/artworks/search", page_params(1)).await.unwrap();
    tokio::time::advance(Duration::from_millis(299_999)).await;
    assert!(pipeline.get("/artworks/search", page_params(1)).await.unwrap().is_cache_hit());
    assert_eq!(transport.calls(), 1);

    tokio::time::advance(Duration::from_millis(2)).await;
    let outcome = pipeline.get("/artworks/search", page_params(1)).await.unwrap();

    assert!(!outcome.is_cache_hit());
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_retry_bound_on_network_failure() {
    let transport = StubTransport::always(offline());
    let pipeline = pipeline_for(&transport);
    let started = Instant::now();

    let err = pipeline.get("/artworks/search", page_params(1)).await.unwrap_err();

    assert_eq!(transport.calls(), 4);
    assert_eq!(transport.seen_attempts(), vec![0, 1, 2, 3]);
    match err {
        GalleryError::RetryExhausted { attempts, source } => {
            assert_eq!(attempts, 4);
            assert_eq!(source.message, "connection refused");
        }
        other => panic!("Expected RetryExhausted error, got {:?}", other),
    }
    // Fixed delay, three waits
    assert_eq!(started.elapsed(), Duration::from_millis(3000));
    assert_eq!(pipeline.cache().size(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_retry_on_http_error() {
    let transport =
        StubTransport::always(Ok(TransportResponse::new(404, r#"{"error":"Not found"}"#)));
    let pipeline = pipeline_for(&transport);

    let err = pipeline.get("/artworks/search", page_params(1)).await.unwrap_err();

    assert_eq!(transport.calls(), 1);
    match err {
        GalleryError::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, r#"{"error":"Not found"}"#);
        }
        other => panic!("Expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_no_retry_on_server_error() {
    let transport = StubTransport::always(Ok(TransportResponse::new(503, "unavailable")));
    let pipeline = pipeline_for(&transport);

    let err = pipeline.get("/artworks/search", page_params(1)).await.unwrap_err();

    assert_eq!(transport.calls(), 1);
    assert_eq!(err.status(), Some(503));
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_transient_failures() {
    let transport = StubTransport::scripted(vec![offline(), offline()], ok(artworks_body(1)));
    let pipeline = pipeline_for(&transport);

    let outcome = pipeline.get("/artworks/search", page_params(1)).await.unwrap();

    assert_eq!(transport.calls(), 3);
    assert_eq!(outcome, Outcome::Fetched { payload: artworks_body(1), attempts: 3 });
    assert_eq!(pipeline.cache().size(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_counter_is_per_call() {
    let transport = StubTransport::scripted(
        vec![offline(), offline(), offline(), ok(artworks_body(1)), offline()],
        ok(artworks_body(2)),
    );
    let pipeline = pipeline_for(&transport);

    pipeline.get("/artworks/search", page_params(1)).await.unwrap();
    pipeline.get("/artworks/search", page_params(2)).await.unwrap();

    // Second call starts again from zero despite the first using every retry
    assert_eq!(transport.seen_attempts(), vec![0, 1, 2, 3, 0, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_non_get_bypasses_cache() {
    let transport = StubTransport::always(ok(json!({ "saved": true })));
    let pipeline = pipeline_for(&transport);

    pipeline.execute(Method::POST, "/bookmarks", page_params(1)).await.unwrap();
    let second = pipeline.execute(Method::POST, "/bookmarks", page_params(1)).await.unwrap();

    assert_eq!(transport.calls(), 2);
    assert!(!second.is_cache_hit());
    assert_eq!(pipeline.cache().size(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_json_is_not_cached() {
    let transport = StubTransport::always(Ok(TransportResponse::new(200, "<html>oops</html>")));
    let pipeline = pipeline_for(&transport);

    let err = pipeline.get("/artworks/search", page_params(1)).await.unwrap_err();

    assert!(matches!(err, GalleryError::InvalidResponse { .. }));
    assert_eq!(transport.calls(), 1);
    assert_eq!(pipeline.cache().size(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_corrupt_cached_payload_is_refetched() {
    let transport = StubTransport::always(ok(artworks_body(1)));
    let pipeline = pipeline_for(&transport);

    let key = fingerprint(&Method::GET, "/artworks/search", &page_params(1));
    pipeline.cache_manager().set(key.clone(), json!("not an artwork response"));

    let response: ArtworkResponse = pipeline
        .get_json("/artworks/search", page_params(1))
        .await
        .unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(response.data[0].id, 1);
    assert_eq!(pipeline.cache_manager().get(&key), Some(artworks_body(1)));
}

#[tokio::test(start_paused = true)]
async fn test_wrong_shape_payload_is_not_cached() {
    let transport = StubTransport::always(ok(json!({ "unexpected": true })));
    let pipeline = pipeline_for(&transport);

    let err = pipeline
        .get_json::<ArtworkResponse>("/artworks/search", page_params(1))
        .await
        .unwrap_err();
    assert!(matches!(err, GalleryError::InvalidResponse { .. }));
    assert_eq!(pipeline.cache_manager().size(), 0);

    let err = pipeline
        .get_json::<ArtworkResponse>("/artworks/search", page_params(1))
        .await
        .unwrap_err();
    assert!(matches!(err, GalleryError::InvalidResponse { .. }));
    assert_eq!(transport.calls(), 2);
    assert_eq!(pipeline.cache_manager().size(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_identical_misses_both_dispatch() {
    let transport = StubTransport::always(ok(artworks_body(1)));
    let pipeline = pipeline_for(&transport);

    let (a, b) = tokio::join!(
        pipeline.get("/artworks/search", page_params(1)),
        pipeline.get("/artworks/search", page_params(1)),
    );

    assert_eq!(a.unwrap().payload(), b.unwrap().payload());
    assert_eq!(transport.calls(), 2);
    assert_eq!(pipeline.cache().size(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shared_cache_between_pipelines() {
    let transport = StubTransport::always(ok(artworks_body(1)));
    let cache = Arc::new(ResponseCache::new());
    let config = PipelineConfig::default();
    let first = RequestPipeline::with_cache(transport.clone(), Arc::clone(&cache), config);
    let second = RequestPipeline::with_cache(transport.clone(), Arc::clone(&cache), config);

    first.get("/artworks/search", page_params(1)).await.unwrap();
    let outcome = second.get("/artworks/search", page_params(1)).await.unwrap();

    assert!(outcome.is_cache_hit());
    assert_eq!(transport.calls(), 1);
}
