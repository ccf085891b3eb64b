//! # gallery-core
//!
//! Core types and utilities shared across all gallery crates.
//!
//! This crate provides:
//! - Artwork, Pagination and ArtworkResponse wire types for the search endpoint
//! - GalleryError enum for unified error handling
//! - Image URL helpers for IIIF image references
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Wire types of the artwork search API
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{GalleryError, GalleryResult, NetworkFailure, NetworkFailureKind};
pub use types::{ApiConfig, Artwork, ArtworkResponse, Pagination};
