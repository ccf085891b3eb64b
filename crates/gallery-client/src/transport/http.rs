//! reqwest-backed transport with connection pooling

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};
use tracing::debug;

use gallery_core::error::{GalleryError, NetworkFailure, NetworkFailureKind};
use gallery_core::GalleryResult;

use super::{RequestDescriptor, Transport, TransportResponse};

/// Public artworks API
pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1";

/// HTTP transport for the artworks API
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// Base API URL, without trailing slash
    base_url: String,
}

impl HttpTransport {
    /// Create a transport against the public artworks API
    pub fn new() -> GalleryResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, concat!("gallery/", env!("CARGO_PKG_VERSION")))
    }

    /// Create a transport against a custom base URL
    pub fn with_base_url(base_url: &str, user_agent: &str) -> GalleryResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .gzip(true)
            .default_headers(headers)
            .user_agent(user_agent)
            .build()
            .map_err(|e| GalleryError::network(format!("Failed to create HTTP client: {}", e), e))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> Result<TransportResponse, NetworkFailure> {
        let url = self.url_for(&request.path);
        debug!("[http] {} {}", request.method, url);

        let response = self
            .client
            .request(request.method.clone(), &url)
            .query(&request.query_pairs())
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| classify(&e, request.timeout))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(&e, request.timeout))?;
        debug!("[http] {} {}", status, url);

        Ok(TransportResponse::new(status, body))
    }
}

/// Map a reqwest failure onto the retryable failure kinds
fn classify(error: &reqwest::Error, timeout: Duration) -> NetworkFailure {
    if error.is_timeout() {
        NetworkFailure::timeout(format!("timeout of {}ms exceeded", timeout.as_millis()))
    } else if error.is_connect() {
        NetworkFailure::connect(error.to_string())
    } else {
        NetworkFailure::new(NetworkFailureKind::Other, error.to_string())
    }
}
