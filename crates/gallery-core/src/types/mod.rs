//! Wire types of the artwork search API.
//!
//! These mirror the JSON returned by `GET /artworks/search`:
//! `{ data: Artwork[], pagination: {...}, config: { iiif_url } }`.

pub mod artwork;

// Re-export all public types
pub use artwork::{ApiConfig, Artwork, ArtworkResponse, Pagination};
