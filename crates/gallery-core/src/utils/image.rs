//! IIIF image URL helpers.
//!
//! Artworks reference their images by `image_id`; the displayable URL is
//! `{iiif_url}/{image_id}/{size}` on the museum's IIIF image server.

/// IIIF base used when a response does not carry its own `config.iiif_url`
pub const DEFAULT_IIIF_URL: &str = "https://www.artic.edu/iiif/2";

/// Region/size/rotation/quality segment for an 843px-wide JPEG
pub const DEFAULT_IMAGE_SIZE: &str = "full/843,/0/default.jpg";

/// Image shown for artworks without an image reference
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/400x600/cccccc/666666?text=No+Image+Available";

/// Build the image URL for an artwork image reference.
///
/// Missing or blank ids resolve to [`PLACEHOLDER_IMAGE_URL`]. `size` defaults to
/// [`DEFAULT_IMAGE_SIZE`].
pub fn image_url(iiif_url: &str, image_id: Option<&str>, size: Option<&str>) -> String {
    match image_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!(
            "{}/{}/{}",
            iiif_url.trim_end_matches('/'),
            id,
            size.unwrap_or(DEFAULT_IMAGE_SIZE)
        ),
        None => PLACEHOLDER_IMAGE_URL.to_string(),
    }
}
