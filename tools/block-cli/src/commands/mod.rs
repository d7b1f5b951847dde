//! CLI command implementations.

pub mod catalog;
pub mod config;
pub mod page;
pub mod render;

use std::time::Duration;

use anyhow::{Context as _, Result};
use block_sdk::block_data::MockContentSource;
use clap::{Args, Subcommand};

use crate::context::Context;

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Block id written on the container (default: leave the attribute off).
    #[arg(short, long)]
    pub block_id: Option<String>,

    /// JSON catalog file to serve content from.
    #[arg(long)]
    pub catalog: Option<String>,

    /// Override the artificial fetch latency.
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Make the content source fail.
    #[arg(long)]
    pub fail_fetch: bool,

    /// Click the button this many times after rendering.
    #[arg(long, default_value = "0")]
    pub click: usize,

    /// Advance the page clock by this many milliseconds after clicking.
    #[arg(long, default_value = "0")]
    pub advance_ms: u64,

    /// Render twice, to check that handlers do not accumulate.
    #[arg(long)]
    pub twice: bool,

    /// Leave the container out of the page.
    #[arg(long)]
    pub no_container: bool,

    /// Leave the title element out of the page.
    #[arg(long)]
    pub no_title: bool,

    /// Leave the description element out of the page.
    #[arg(long)]
    pub no_description: bool,

    /// Leave the button out of the page.
    #[arg(long)]
    pub no_button: bool,
}

/// Arguments for the page command.
#[derive(Args)]
pub struct PageArgs {
    /// Block id written on the container.
    #[arg(short, long)]
    pub block_id: Option<String>,

    /// Page title.
    #[arg(short, long, default_value = "Content Block")]
    pub title: String,

    /// Path of the generated JS module.
    #[arg(long, default_value = "./pkg/content_block.js")]
    pub script: String,

    /// Embed the active configuration in the page.
    #[arg(long)]
    pub embed_config: bool,

    /// Write the page to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// JSON catalog file (default: built-in catalog).
    #[arg(long)]
    pub catalog: Option<String>,

    /// Show a single entry.
    #[arg(short, long)]
    pub block_id: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Content source for a command: the catalog file if given, else the
/// built-in catalog.
pub(crate) fn load_source(
    ctx: &Context,
    catalog: Option<&str>,
    latency: Duration,
) -> Result<MockContentSource> {
    let source = match catalog {
        Some(path) => {
            let path = ctx.resolve_path(path);
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
            MockContentSource::from_json(&json)
                .with_context(|| format!("Failed to parse catalog: {}", path.display()))?
        }
        None => MockContentSource::with_default_catalog(),
    };
    Ok(source.with_latency(latency))
}
