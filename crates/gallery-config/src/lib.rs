//! Configuration loading for the gallery client
//!
//! This crate handles parsing and validation of gallery.toml files and layers
//! global, project and environment configuration into one resolved view.

pub mod merge;
pub mod toml;

// Re-export main types
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource, LoadedConfig};
pub use self::toml::{ApiSection, GalleryToml, ImagesSection};

use gallery_core::error::GalleryError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, GalleryError>;
