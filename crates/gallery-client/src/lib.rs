//! Artwork search client for the gallery app
//!
//! This crate provides a request pipeline over a pluggable HTTP transport with
//! time-bounded response caching and fixed-delay retry on network failures,
//! plus a typed façade for the paginated artwork search endpoint.

pub mod api;
pub mod cache;
pub mod pipeline;
pub mod retry;
pub mod transport;

// Re-export main types
pub use api::{ArtworksApi, ListQuery, SearchQuery};
pub use cache::{fingerprint, CacheEntry, CacheManager, CacheStats, ResponseCache};
pub use pipeline::{Outcome, PipelineConfig, RequestPipeline};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, Params, RequestDescriptor, Transport, TransportResponse};

pub use gallery_core::error::{GalleryError, GalleryResult};
