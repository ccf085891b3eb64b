//! Request pipeline: cache lookup, dispatch, retry and cache population
//!
//! Each logical call walks `CacheCheck -> Dispatch -> (Wait -> Dispatch)* -> Done`
//! in a single loop. Only GET requests touch the cache. Only attempts that got
//! no response at all are retried; any received status outside 2xx is terminal.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use gallery_core::error::{GalleryError, GalleryResult};

use crate::cache::{fingerprint, CacheManager, ResponseCache};
use crate::retry::RetryPolicy;
use crate::transport::{Params, RequestDescriptor, Transport};

/// Pipeline-wide constants, fixed once the pipeline is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub cache_ttl: Duration,
    pub default_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            cache_ttl: Duration::from_millis(300_000),
            default_timeout: Duration::from_millis(10_000),
        }
    }
}

impl PipelineConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.max_retries, self.retry_delay)
    }
}

/// Successful result of a logical call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Served from cache; the transport was not invoked
    CacheHit(Value),
    /// Fetched from the transport after `attempts` dispatches
    Fetched { payload: Value, attempts: u32 },
}

impl Outcome {
    pub fn payload(&self) -> &Value {
        match self {
            Outcome::CacheHit(payload) | Outcome::Fetched { payload, .. } => payload,
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            Outcome::CacheHit(payload) | Outcome::Fetched { payload, .. } => payload,
        }
    }

    pub fn is_cache_hit(&self) -> bool {
        matches!(self, Outcome::CacheHit(_))
    }
}

/// Orchestrates fingerprinting, caching, transport and retry
#[derive(Clone)]
pub struct RequestPipeline {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
    retry: RetryPolicy,
    config: PipelineConfig,
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("cache_entries", &self.cache.size())
            .field("config", &self.config)
            .finish()
    }
}

impl RequestPipeline {
    /// Create a pipeline with its own empty cache
    pub fn new(transport: Arc<dyn Transport>, config: PipelineConfig) -> Self {
        Self::with_cache(transport, Arc::new(ResponseCache::new()), config)
    }

    /// Create a pipeline sharing an existing cache
    pub fn with_cache(
        transport: Arc<dyn Transport>,
        cache: Arc<ResponseCache>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            transport,
            cache,
            retry: config.retry_policy(),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// External handle for inspecting or resetting the cache
    pub fn cache_manager(&self) -> CacheManager {
        CacheManager::new(Arc::clone(&self.cache), self.config.cache_ttl)
    }

    /// Run a GET through the pipeline
    pub async fn get(&self, path: &str, params: Params) -> GalleryResult<Outcome> {
        self.execute(Method::GET, path, params).await
    }

    /// Run one logical call through the pipeline
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        params: Params,
    ) -> GalleryResult<Outcome> {
        let mut request = RequestDescriptor::new(method, path, params, self.config.default_timeout);
        let cache_key = (request.method == Method::GET)
            .then(|| fingerprint(&request.method, &request.path, &request.params));

        if let Some(key) = &cache_key {
            if let Some(payload) = self.cache.get(key) {
                debug!("[cache] hit for {}", request.path);
                return Ok(Outcome::CacheHit(payload));
            }
        }

        loop {
            debug!(
                "[request] {} {} attempt {}/{}",
                request.method,
                request.path,
                request.attempt_count + 1,
                self.retry.max_attempts()
            );

            let failure = match self.transport.execute(&request).await {
                Ok(response) if response.is_success() => {
                    let payload: Value = serde_json::from_str(&response.body).map_err(|e| {
                        GalleryError::InvalidResponse {
                            message: format!("{} {}: {}", request.method, request.path, e),
                        }
                    })?;

                    if let Some(key) = &cache_key {
                        self.cache.put(key.as_str(), payload.clone(), self.config.cache_ttl);
                        debug!("[cache] stored {}", request.path);
                    }

                    return Ok(Outcome::Fetched {
                        payload,
                        attempts: request.attempt_count + 1,
                    });
                }
                Ok(response) => {
                    error!(
                        "[request] {} {} failed with status {}",
                        request.method, request.path, response.status
                    );
                    return Err(GalleryError::HttpStatus {
                        status: response.status,
                        body: response.body,
                    });
                }
                Err(failure) => failure,
            };

            match self.retry.next_delay(request.attempt_count) {
                Some(delay) => {
                    request.attempt_count += 1;
                    warn!(
                        "[retry] {} {} attempt {}/{} after {}",
                        request.method,
                        request.path,
                        request.attempt_count,
                        self.retry.max_retries,
                        failure
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    error!(
                        "[request] {} {} gave up after {} attempts: {}",
                        request.method,
                        request.path,
                        request.attempt_count + 1,
                        failure
                    );
                    return Err(GalleryError::RetryExhausted {
                        attempts: request.attempt_count + 1,
                        source: failure,
                    });
                }
            }
        }
    }

    /// GET and decode the payload into `T`.
    ///
    /// A cached payload that no longer decodes is logged, evicted and fetched
    /// again instead of failing the call.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Params,
    ) -> GalleryResult<T> {
        let outcome = self.get(path, params.clone()).await?;

        match outcome {
            Outcome::CacheHit(payload) => match serde_json::from_value(payload) {
                Ok(decoded) => Ok(decoded),
                Err(e) => {
                    let cause = GalleryError::Cache { message: e.to_string() };
                    warn!("[cache] {} for {}, refetching", cause, path);
                    self.evict(path, &params);
                    let payload = self.get(path, params.clone()).await?.into_payload();
                    self.decode_fetched(path, &params, payload)
                }
            },
            Outcome::Fetched { payload, .. } => self.decode_fetched(path, &params, payload),
        }
    }

    /// Decode a freshly fetched payload, evicting it when it has the wrong shape
    fn decode_fetched<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &Params,
        payload: Value,
    ) -> GalleryResult<T> {
        decode(path, payload).map_err(|e| {
            self.evict(path, params);
            e
        })
    }

    fn evict(&self, path: &str, params: &Params) {
        self.cache.remove(&fingerprint(&Method::GET, path, params));
    }
}

fn decode<T: DeserializeOwned>(path: &str, payload: Value) -> GalleryResult<T> {
    serde_json::from_value(payload).map_err(|e| GalleryError::InvalidResponse {
        message: format!("{}: {}", path, e),
    })
}

#[cfg(test)]
mod tests;
