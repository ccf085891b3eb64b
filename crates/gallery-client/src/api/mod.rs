//! Typed façade over the artwork search endpoint

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use gallery_core::error::{GalleryError, GalleryResult, Operation};
use gallery_core::ArtworkResponse;

use crate::cache::CacheManager;
use crate::pipeline::{PipelineConfig, RequestPipeline};
use crate::transport::{HttpTransport, Params};

/// Search endpoint path, relative to the API base URL
pub const SEARCH_PATH: &str = "/artworks/search";

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

/// Field projection requested on every search
pub const ARTWORK_FIELDS: &str = concat!(
    "id,title,artist_title,description,image_id,",
    "date_display,medium_display,style_title,classification_title"
);

fn validate_page_and_limit(page: u32, limit: u32) -> GalleryResult<()> {
    if page == 0 {
        return Err(GalleryError::validation("page", "must be greater than 0"));
    }
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(GalleryError::validation(
            "limit",
            format!("must be between 1 and {}", MAX_LIMIT),
        ));
    }
    Ok(())
}

/// Trimmed value, or `None` when blank
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn base_params(page: u32, limit: u32) -> Params {
    let mut params = Params::new();
    params.insert("page".to_string(), Value::from(page));
    params.insert("limit".to_string(), Value::from(limit));
    params.insert("fields".to_string(), Value::from(ARTWORK_FIELDS));
    params
}

/// Validated parameters of a listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    page: u32,
    limit: u32,
    query: Option<String>,
}

impl ListQuery {
    /// Validate listing parameters; a blank query is dropped
    pub fn new(page: u32, limit: u32, query: Option<&str>) -> GalleryResult<Self> {
        validate_page_and_limit(page, limit)?;
        Ok(Self {
            page,
            limit,
            query: non_blank(query),
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Same listing, one page further; `None` past the last addressable page
    pub fn next_page(&self) -> Option<Self> {
        let page = self.page.checked_add(1)?;
        Some(Self {
            page,
            ..self.clone()
        })
    }

    pub fn to_params(&self) -> Params {
        let mut params = base_params(self.page, self.limit);
        if let Some(query) = &self.query {
            params.insert("q".to_string(), Value::from(query.as_str()));
        }
        params
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            query: None,
        }
    }
}

/// Validated parameters of a filtered search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    query: String,
    page: u32,
    limit: u32,
    artist: Option<String>,
    classification: Option<String>,
}

impl SearchQuery {
    /// Validate search parameters; the query must be non-empty once trimmed
    pub fn new(
        query: &str,
        page: u32,
        limit: u32,
        artist: Option<&str>,
        classification: Option<&str>,
    ) -> GalleryResult<Self> {
        let query = non_blank(Some(query))
            .ok_or_else(|| GalleryError::validation("query", "search query is required"))?;
        validate_page_and_limit(page, limit)?;

        Ok(Self {
            query,
            page,
            limit,
            artist: non_blank(artist),
            classification: non_blank(classification),
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn classification(&self) -> Option<&str> {
        self.classification.as_deref()
    }

    pub fn to_params(&self) -> Params {
        let mut params = base_params(self.page, self.limit);
        params.insert("q".to_string(), Value::from(self.query.as_str()));
        if let Some(artist) = &self.artist {
            params.insert("artist_title".to_string(), Value::from(artist.as_str()));
        }
        if let Some(classification) = &self.classification {
            params.insert(
                "classification_title".to_string(),
                Value::from(classification.as_str()),
            );
        }
        params
    }
}

/// Artwork listing and search client
#[derive(Debug, Clone)]
pub struct ArtworksApi {
    pipeline: Arc<RequestPipeline>,
}

impl ArtworksApi {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Client for the public API with default pipeline settings
    pub fn public() -> GalleryResult<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::new(RequestPipeline::new(
            Arc::new(transport),
            PipelineConfig::default(),
        )))
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    pub fn cache_manager(&self) -> CacheManager {
        self.pipeline.cache_manager()
    }

    /// List artworks, optionally narrowed by a free-text query
    pub async fn list_artworks(
        &self,
        page: u32,
        limit: u32,
        query: Option<&str>,
    ) -> GalleryResult<ArtworkResponse> {
        let request =
            ListQuery::new(page, limit, query).map_err(|e| e.within(Operation::FetchArtworks))?;
        self.list(&request).await
    }

    /// List artworks from already validated parameters
    pub async fn list(&self, request: &ListQuery) -> GalleryResult<ArtworkResponse> {
        info!(
            "Fetching artworks page {} (limit {}, query {:?})",
            request.page, request.limit, request.query
        );
        self.pipeline
            .get_json(SEARCH_PATH, request.to_params())
            .await
            .map_err(|e| {
                error!("[artworks] list failed: {}", e);
                e.within(Operation::FetchArtworks)
            })
    }

    /// Search artworks by query with optional artist and classification filters
    pub async fn search_artworks(
        &self,
        query: &str,
        page: u32,
        limit: u32,
        artist: Option<&str>,
        classification: Option<&str>,
    ) -> GalleryResult<ArtworkResponse> {
        let request = SearchQuery::new(query, page, limit, artist, classification)
            .map_err(|e| e.within(Operation::SearchArtworks))?;
        self.search(&request).await
    }

    /// Search artworks from already validated parameters
    pub async fn search(&self, request: &SearchQuery) -> GalleryResult<ArtworkResponse> {
        info!(
            "Searching artworks for {:?} page {} (limit {})",
            request.query, request.page, request.limit
        );
        self.pipeline
            .get_json(SEARCH_PATH, request.to_params())
            .await
            .map_err(|e| {
                error!("[artworks] search failed: {}", e);
                e.within(Operation::SearchArtworks)
            })
    }
}
