//! Command implementations and dispatch logic.
//!
//! Every handler is an async function taking the shared [`CommandContext`].

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use gallery_client::{ArtworksApi, HttpTransport, PipelineConfig, RequestPipeline};
use gallery_config::{ApiSection, ConfigLoader, LoadedConfig};
use gallery_core::error::{GalleryError, GalleryResult};
use gallery_core::{Artwork, ArtworkResponse};
use tracing::info;

pub mod config;
pub mod list;
pub mod search;


use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub output: OutputHandler,
    pub loaded: LoadedConfig,
    pub api: ArtworksApi,
}

impl CommandContext {
    /// Resolve configuration from the working directory and build the client
    pub async fn new(config_path: Option<&Utf8Path>) -> GalleryResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| GalleryError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| GalleryError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("working directory is not valid UTF-8: {}", e),
        })?;

        let loaded = ConfigLoader::new(cwd).load(config_path).await?;
        Self::with_config(loaded)
    }

    /// Build a context from an already resolved configuration
    pub fn with_config(loaded: LoadedConfig) -> GalleryResult<Self> {
        let api = build_api(&loaded.config.api)?;
        Ok(Self {
            output: OutputHandler::new(),
            loaded,
            api,
        })
    }
}

/// Pipeline settings derived from the `[api]` section
pub fn pipeline_config(api: &ApiSection) -> PipelineConfig {
    PipelineConfig {
        max_retries: api.max_retries,
        retry_delay: api.retry_delay(),
        cache_ttl: api.cache_ttl(),
        default_timeout: api.timeout(),
    }
}

fn build_api(api: &ApiSection) -> GalleryResult<ArtworksApi> {
    let transport = HttpTransport::with_base_url(&api.base_url, &api.user_agent)?;
    let pipeline = RequestPipeline::new(Arc::new(transport), pipeline_config(api));
    Ok(ArtworksApi::new(pipeline))
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> GalleryResult<()> {
    match command {
        Commands::List { page, limit, query } => {
            info!("Listing artworks (page: {}, limit: {})", page, limit);
            list::execute(page, limit, query, ctx).await
        }
        Commands::Search {
            query,
            page,
            limit,
            artist,
            classification,
        } => {
            info!("Searching artworks for '{}'", query);
            search::execute(&query, page, limit, artist, classification, ctx).await
        }
        Commands::Config => config::execute(ctx).await,
    }
}

/// Print one page of results followed by its pagination footer
pub(crate) fn print_artworks(response: &ArtworkResponse, ctx: &CommandContext) {
    if response.data.is_empty() {
        ctx.output.warn("No artworks found");
        return;
    }

    let images = &ctx.loaded.config.images;
    for artwork in &response.data {
        let size = Some(images.default_size.as_str());
        let url = response.image_url_with(artwork, &images.iiif_url, size);
        ctx.output.line(&format_artwork(artwork, &url));
    }

    ctx.output.info(&pagination_footer(response));
}

/// Render an artwork as a headline plus indented detail lines
pub fn format_artwork(artwork: &Artwork, image_url: &str) -> String {
    let title = if artwork.title.trim().is_empty() {
        "Untitled"
    } else {
        artwork.title.as_str()
    };

    let mut text = format!("#{} {}", artwork.id, title);
    if let Some(artist) = artwork.artist_title.as_deref() {
        text.push_str(" by ");
        text.push_str(artist);
    }

    let details: Vec<&str> = [
        &artwork.date_display,
        &artwork.classification_title,
        &artwork.medium_display,
    ]
    .into_iter()
    .filter_map(|value| value.as_deref())
    .collect();
    if !details.is_empty() {
        text.push_str("\n    ");
        text.push_str(&details.join(", "));
    }

    text.push_str("\n    ");
    text.push_str(image_url);
    text
}

pub fn pagination_footer(response: &ArtworkResponse) -> String {
    let pagination = &response.pagination;
    let mut footer = format!(
        "Page {} of {}",
        pagination.current_page, pagination.total_pages
    );
    if let Some(total) = pagination.total {
        footer.push_str(&format!(" ({} artworks)", total));
    }
    if let Some(next) = pagination.next_page() {
        footer.push_str(&format!(", next: --page {}", next));
    }
    footer
}
