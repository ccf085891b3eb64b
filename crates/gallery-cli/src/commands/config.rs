//! `gallery config` command implementation.
//!
//! Prints the resolved configuration as TOML along with the layers that
//! contributed to it.

use gallery_config::toml::serialize_gallery_toml;
use gallery_config::ConfigSource;
use gallery_core::error::GalleryResult;

use super::CommandContext;

/// Execute the `gallery config` command
pub async fn execute(ctx: &CommandContext) -> GalleryResult<()> {
    let text = serialize_gallery_toml(&ctx.loaded.config)?;
    ctx.output.line(text.trim_end());
    ctx.output.line("");

    if ctx.loaded.sources.is_empty() {
        ctx.output.info("# using built-in defaults");
    }
    for source in &ctx.loaded.sources {
        ctx.output.info(&format!("# {}", describe_source(source)));
    }

    Ok(())
}

pub fn describe_source(source: &ConfigSource) -> String {
    match source {
        ConfigSource::Global(path) => format!("global: {}", path),
        ConfigSource::Project(path) => format!("project: {}", path),
        ConfigSource::Explicit(path) => format!("--config: {}", path),
        ConfigSource::Environment(name) => format!("env: {}", name),
    }
}
