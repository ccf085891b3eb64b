//! `gallery search` command implementation.
//!
//! Runs a full-text search, optionally narrowed by artist and classification.

use gallery_core::error::GalleryResult;

use super::CommandContext;

/// Execute the `gallery search` command
pub async fn execute(
    query: &str,
    page: u32,
    limit: u32,
    artist: Option<String>,
    classification: Option<String>,
    ctx: &CommandContext,
) -> GalleryResult<()> {
    let response = ctx
        .api
        .search_artworks(query, page, limit, artist.as_deref(), classification.as_deref())
        .await?;

    ctx.output.success(&format!("Results for '{}'", query.trim()));
    super::print_artworks(&response, ctx);
    Ok(())
}
