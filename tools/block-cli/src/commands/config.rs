//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use block_sdk::block_core::BlockConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;
    ctx.output.section("markup");
    ctx.output.kv("container", &config.markup.container);
    ctx.output.kv("id_attribute", &config.markup.id_attribute);
    ctx.output.kv("title", &config.markup.title);
    ctx.output.kv("description", &config.markup.description);
    ctx.output.kv("button", &config.markup.button);

    ctx.output.section("content");
    ctx.output.kv("fallback_block", &config.content.fallback_block);
    ctx.output.kv("latency_ms", &config.content.latency_ms.to_string());

    ctx.output.section("notification");
    ctx.output.kv("fade_in_delay_ms", &config.notification.fade_in_delay_ms.to_string());
    ctx.output.kv("display_ms", &config.notification.display_ms.to_string());
    ctx.output.kv("transition_ms", &config.notification.transition_ms.to_string());
    ctx.output.kv("class_name", &config.notification.class_name);

    ctx.output.section("logging");
    ctx.output.kv("level", &config.logging.level);
    ctx.output.kv("format", &config.logging.format);

    ctx.output.kv("navigation", &format!("{:?}", config.navigation));

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, default_config_file()?)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    ctx.config.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let notification = &ctx.config.notification;
    if notification.fade_in_delay_ms >= notification.display_ms {
        warnings.push(
            "notification.fade_in_delay_ms >= display_ms: notifications will never be shown"
                .to_string(),
        );
    }
    if notification.transition_ms == 0 {
        warnings.push("notification.transition_ms is 0: notifications will not fade".to_string());
    }
    if ctx.config.content.latency_ms > 10_000 {
        warnings.push(format!(
            "content.latency_ms is {}: the block stays empty that long",
            ctx.config.content.latency_ms
        ));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
    } else {
        ctx.output.success("Configuration is valid (with warnings)");
    }

    Ok(())
}

/// Contents of a fresh `block.toml`.
fn default_config_file() -> Result<String> {
    let body = toml::to_string_pretty(&BlockConfig::default())
        .context("Failed to serialize default config")?;
    Ok(format!("# Content block configuration\n\n{}", body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_round_trips() {
        let content = default_config_file().unwrap();
        assert!(content.starts_with("# Content block configuration"));

        let parsed = BlockConfig::from_toml(&content).unwrap();
        assert_eq!(parsed, BlockConfig::default());
    }
}
