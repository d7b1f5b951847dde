//! Block CLI - Command line tool for the content block renderer.
//!
//! Commands:
//! - `block render` - Mount a block onto an in-memory page and report the result
//! - `block page` - Print the host page for a block
//! - `block catalog` - List the content catalog
//! - `block config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use commands::{CatalogArgs, ConfigArgs, PageArgs, RenderArgs};

/// Block CLI - Render and inspect content blocks
#[derive(Parser)]
#[command(name = "block")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount a block onto an in-memory page
    Render(RenderArgs),

    /// Print the host page for a block
    Page(PageArgs),

    /// List the content catalog
    Catalog(CatalogArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose && !cli.json {
        init_tracing();
    }

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    let result = match cli.command {
        Commands::Render(args) => commands::render::run(args, &ctx).await,
        Commands::Page(args) => commands::page::run(args, &ctx).await,
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Send renderer logs forwarded through `tracing` to stderr.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
