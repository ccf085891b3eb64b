//! Artwork search response types.

use serde::{Deserialize, Serialize};

use crate::utils::image::{image_url, DEFAULT_IIIF_URL};

/// A single artwork as returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// IIIF image identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium_display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_title: Option<String>,
}

/// Page position within a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    /// Total number of matching artworks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page number to request next, if any
    pub fn next_page(&self) -> Option<u32> {
        self.has_next_page().then(|| self.current_page + 1)
    }
}

/// Response-level configuration block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the IIIF image server
    pub iiif_url: String,
}

/// Body of `GET /artworks/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkResponse {
    pub data: Vec<Artwork>,
    pub pagination: Pagination,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ApiConfig>,
}

impl ArtworkResponse {
    /// IIIF base advertised by this response, or the museum default
    pub fn iiif_url(&self) -> &str {
        self.iiif_url_or(DEFAULT_IIIF_URL)
    }

    /// IIIF base advertised by this response, or `fallback`
    pub fn iiif_url_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.config
            .as_ref()
            .map(|config| config.iiif_url.as_str())
            .unwrap_or(fallback)
    }

    /// Default-size image URL for an artwork of this response
    pub fn image_url(&self, artwork: &Artwork) -> String {
        self.image_url_with(artwork, DEFAULT_IIIF_URL, None)
    }

    /// Image URL resolved against `fallback_iiif` when the response names no
    /// IIIF server
    pub fn image_url_with(
        &self,
        artwork: &Artwork,
        fallback_iiif: &str,
        size: Option<&str>,
    ) -> String {
        image_url(self.iiif_url_or(fallback_iiif), artwork.image_id.as_deref(), size)
    }
}
