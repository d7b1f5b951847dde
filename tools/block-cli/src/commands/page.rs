//! Page command: print the host page for a block.

use anyhow::{Context as _, Result};
use content_block::page::HostPage;

use super::PageArgs;
use crate::context::Context;

/// Run the page command.
pub async fn run(args: PageArgs, ctx: &Context) -> Result<()> {
    let mut page = HostPage::new(&args.title)
        .with_markup(ctx.config.markup.clone())
        .with_script(&args.script);
    if let Some(id) = &args.block_id {
        page = page.with_block_id(id);
    }
    if args.embed_config {
        page = page.with_config(ctx.config.clone());
    }

    let html = page.render().context("Failed to render host page")?;

    match &args.output {
        Some(path) => {
            let path = ctx.resolve_path(path);
            std::fs::write(&path, &html)
                .with_context(|| format!("Failed to write page: {}", path.display()))?;
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "path": path.display().to_string(),
                    "bytes": html.len(),
                }));
            } else {
                ctx.output.success(&format!("Wrote {}", path.display()));
            }
        }
        None => print!("{}", html),
    }

    Ok(())
}
