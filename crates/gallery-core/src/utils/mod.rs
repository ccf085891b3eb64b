//! Utility functions and helpers.
//!
//! Common functionality used across multiple gallery crates.

pub mod image;

// Re-export commonly used utilities
pub use image::{image_url, DEFAULT_IIIF_URL, DEFAULT_IMAGE_SIZE, PLACEHOLDER_IMAGE_URL};
