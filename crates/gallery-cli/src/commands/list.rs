//! `gallery list` command implementation.

use gallery_core::error::GalleryResult;

use super::CommandContext;

/// Execute the `gallery list` command
pub async fn execute(
    page: u32,
    limit: u32,
    query: Option<String>,
    ctx: &CommandContext,
) -> GalleryResult<()> {
    let response = ctx.api.list_artworks(page, limit, query.as_deref()).await?;
    super::print_artworks(&response, ctx);
    Ok(())
}
