//! gallery.toml configuration parsing and serialization

use std::time::Duration;

use camino::Utf8Path;
use gallery_core::error::GalleryError;
use gallery_core::utils::image::{DEFAULT_IIIF_URL, DEFAULT_IMAGE_SIZE};
use serde::{Deserialize, Serialize};

use crate::ConfigResult;

/// Public artworks API
pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1";

/// Upper bound accepted for `api.max_retries`
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Complete gallery.toml configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GalleryToml {
    /// HTTP client settings
    #[serde(default)]
    pub api: ApiSection,

    /// Image URL settings
    #[serde(default)]
    pub images: ImagesSection,
}

/// `[api]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Base URL of the artworks API
    pub base_url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Retries after a request that got no response
    pub max_retries: u32,

    /// Fixed delay between retries in milliseconds
    pub retry_delay_ms: u64,

    /// Lifetime of cached GET responses in milliseconds
    pub cache_ttl_ms: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 10_000,
            max_retries: 3,
            retry_delay_ms: 1_000,
            cache_ttl_ms: 300_000,
            user_agent: concat!("gallery/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

/// `[images]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesSection {
    /// IIIF image server used when a response does not name one
    pub iiif_url: String,

    /// IIIF region/size/rotation/quality segment
    pub default_size: String,
}

impl Default for ImagesSection {
    fn default() -> Self {
        Self {
            iiif_url: DEFAULT_IIIF_URL.to_string(),
            default_size: DEFAULT_IMAGE_SIZE.to_string(),
        }
    }
}

/// Parse TOML string to GalleryToml configuration
pub fn parse_gallery_toml(content: &str) -> ConfigResult<GalleryToml> {
    let config: GalleryToml = toml::from_str(content).map_err(|e| GalleryError::TomlParse {
        message: e.to_string(),
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Parse TOML string to an untyped table, for layering
pub fn parse_table(content: &str) -> ConfigResult<toml::Table> {
    content.parse::<toml::Table>().map_err(|e| GalleryError::TomlParse {
        message: e.to_string(),
    })
}

/// Serialize GalleryToml to TOML string
pub fn serialize_gallery_toml(config: &GalleryToml) -> ConfigResult<String> {
    toml::to_string_pretty(config).map_err(|e| GalleryError::TomlParse {
        message: format!("TOML serialization error: {}", e),
    })
}

/// Validate configuration values
pub fn validate_config(config: &GalleryToml) -> ConfigResult<()> {
    validate_http_url("api.base_url", &config.api.base_url)?;
    validate_http_url("images.iiif_url", &config.images.iiif_url)?;

    if config.api.timeout_ms == 0 {
        return Err(GalleryError::ConfigValidation {
            field: "api.timeout_ms".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    if config.api.max_retries > MAX_RETRIES_LIMIT {
        return Err(GalleryError::ConfigValidation {
            field: "api.max_retries".to_string(),
            reason: format!("must be at most {}", MAX_RETRIES_LIMIT),
        });
    }

    if config.api.user_agent.trim().is_empty() {
        return Err(GalleryError::ConfigValidation {
            field: "api.user_agent".to_string(),
            reason: "cannot be empty".to_string(),
        });
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> ConfigResult<()> {
    let parsed = url::Url::parse(value).map_err(|e| GalleryError::ConfigValidation {
        field: field.to_string(),
        reason: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(GalleryError::ConfigValidation {
            field: field.to_string(),
            reason: format!("unsupported scheme '{}', expected http or https", scheme),
        }),
    }
}

/// Load and parse gallery.toml file
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<GalleryToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| GalleryError::io(format!("Failed to read {}", path), e))?;

    parse_gallery_toml(&content).map_err(|e| match e {
        GalleryError::TomlParse { message } => GalleryError::TomlParse {
            message: format!("In file {}: {}", path, message),
        },
        other => other,
    })
}
