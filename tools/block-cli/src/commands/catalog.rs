//! Catalog command: list the content a source serves.

use anyhow::{bail, Result};
use block_sdk::block_core::BlockId;
use serde_json::{Map, Value};

use super::{load_source, CatalogArgs};
use crate::context::Context;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let source = load_source(ctx, args.catalog.as_deref(), ctx.config.content.latency())?;

    if let Some(id) = &args.block_id {
        let id = BlockId::new(id.as_str());
        let Some(payload) = source.get(&id) else {
            bail!("No catalog entry for '{}'", id);
        };

        if ctx.output.is_json() {
            ctx.output.json(payload);
            return Ok(());
        }

        ctx.output.header(id.as_str());
        ctx.output.kv("title", &payload.title);
        ctx.output.kv("description", &payload.description);
        if let Some(text) = payload.button_text() {
            ctx.output.kv("button", text);
        }
        if let Some(link) = payload.button_link() {
            ctx.output.kv("link", link);
        }
        return Ok(());
    }

    if ctx.output.is_json() {
        let mut entries = Map::new();
        for id in source.ids() {
            if let Some(payload) = source.get(id) {
                entries.insert(id.to_string(), serde_json::to_value(payload)?);
            }
        }
        ctx.output.json(&Value::Object(entries));
        return Ok(());
    }

    ctx.output.header(&format!("Catalog ({} entries)", source.len()));
    let widths = [18, 28, 14, 24];
    ctx.output.table_row(&["ID", "TITLE", "BUTTON", "LINK"], &widths);
    for id in source.ids() {
        if let Some(payload) = source.get(id) {
            ctx.output.table_row(
                &[
                    id.as_str(),
                    &payload.title,
                    payload.button_text().unwrap_or("-"),
                    payload.button_link().unwrap_or("-"),
                ],
                &widths,
            );
        }
    }
    ctx.output.note(&format!(
        "Unknown ids render \"Content Not Found\" after {}ms",
        source.latency().as_millis()
    ));

    Ok(())
}
