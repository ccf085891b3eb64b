//! # gallery-cli
//!
//! Command line browser for the public artworks collection.
//!
//! Parses arguments, sets up logging, resolves configuration and dispatches to
//! the command handlers.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use gallery_core::error::GalleryResult;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Browse and search the public artworks collection
#[derive(Parser)]
#[command(name = "gallery", version, about = "Browse and search museum artworks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of a discovered gallery.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List artworks page by page
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Optional full-text filter
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Search artworks
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Restrict to an artist
        #[arg(long)]
        artist: Option<String>,
        /// Restrict to a classification such as "painting"
        #[arg(long)]
        classification: Option<String>,
    },
    /// Show the resolved configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Starting gallery v{}", env!("CARGO_PKG_VERSION"));

    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

    if let Err(err) = rt.block_on(run_cli(cli)) {
        error!("Command failed: {}", err);
        eprintln!("{}", ErrorFormatter::new().format_error(&err));
        std::process::exit(1);
    }

    Ok(())
}

async fn run_cli(cli: Cli) -> GalleryResult<()> {
    let ctx = CommandContext::new(cli.config.as_deref()).await?;
    commands::dispatch_command(cli.command, &ctx).await
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "gallery={level},gallery_cli={level},gallery_client={level},gallery_config={level}"
        ))
    });

    // stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
