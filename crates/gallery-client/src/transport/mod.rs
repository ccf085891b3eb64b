//! Transport boundary between the request pipeline and the network

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use gallery_core::error::NetworkFailure;

mod http;

pub use http::{HttpTransport, DEFAULT_BASE_URL};

/// Query parameters of a request, kept sorted by key
pub type Params = BTreeMap<String, Value>;

/// One logical request as it moves through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the transport's base URL, e.g. `/artworks/search`
    pub path: String,
    pub params: Params,
    pub timeout: Duration,
    /// Retries already spent on this call
    pub attempt_count: u32,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>, params: Params, timeout: Duration) -> Self {
        Self {
            method,
            path: path.into(),
            params,
            timeout,
            attempt_count: 0,
        }
    }

    /// Query string pairs with scalar values rendered without JSON quoting
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect()
    }
}

/// A response the transport received, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes a single request attempt.
///
/// Returning `Err` means no response was obtained at all; any response,
/// including 4xx and 5xx, is returned as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> Result<TransportResponse, NetworkFailure>;
}
