//! Render command: mount a block onto an in-memory page.

use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use block_sdk::prelude::*;
use serde::Serialize;

use super::{load_source, RenderArgs};
use crate::context::Context;
use crate::output::{format_millis, origin_badge};

/// Content source that is always down.
struct UnavailableSource;

#[async_trait(?Send)]
impl ContentSource for UnavailableSource {
    async fn fetch_content(&self, _id: &BlockId) -> Result<ContentPayload, FetchError> {
        Err(FetchError::Unavailable(
            "content source disabled by --fail-fetch".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// What to do to the page.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub template: HostTemplate,
    pub mounts: usize,
    pub clicks: usize,
    pub advance: Duration,
}

#[derive(Debug, Serialize)]
pub struct ButtonReport {
    pub text: String,
    pub visible: bool,
    pub handlers: usize,
}

/// State of the page after a scenario ran.
#[derive(Debug, Serialize)]
pub struct RenderReport {
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<ButtonReport>,
    pub notifications: Vec<String>,
    pub location: String,
    pub clock_ms: u64,
    pub logs: Vec<LogEntry>,
}

/// Run `scenario` against a fresh in-memory page.
pub async fn simulate(
    config: &BlockConfig,
    source: Rc<dyn ContentSource>,
    scenario: &Scenario,
    extra_sink: Option<Rc<dyn LogSink>>,
) -> Result<RenderReport> {
    let dom = MemoryDom::new();
    let nodes = scenario
        .template
        .build(&dom, &config.markup)
        .context("Failed to build host page")?;

    let memory = MemorySink::new();
    let mut sink = FanoutSink::new().with(Rc::new(memory.clone()));
    if let Some(extra) = extra_sink {
        sink = sink.with(extra);
    }
    let logger = StructuredLogger::from_config(&config.logging, Rc::new(sink));

    let mount = BlockMount::new(dom.clone(), source, config.clone(), logger);
    let mut outcome = MountOutcome::ContainerMissing;
    for _ in 0..scenario.mounts.max(1) {
        outcome = mount.run().await;
    }

    let button = dom
        .query(&config.markup.button)
        .context("Invalid button selector")?;
    if let Some(button) = button {
        for _ in 0..scenario.clicks {
            dom.click(button);
        }
    }
    dom.advance(scenario.advance);

    let toast_selector = format!(".{}", config.notification.class_name);
    let notifications = dom
        .query_all(&toast_selector)
        .context("Invalid notification class")?
        .iter()
        .map(|node| dom.text(node))
        .collect();

    let (outcome_name, block_id) = match &outcome {
        MountOutcome::Rendered { block_id, origin } => {
            (origin.to_string(), Some(block_id.to_string()))
        }
        MountOutcome::ContainerMissing => ("container-missing".to_string(), None),
        MountOutcome::Failed { .. } => ("failed".to_string(), None),
    };

    Ok(RenderReport {
        outcome: outcome_name,
        block_id,
        title: nodes.title.map(|n| dom.text(&n)),
        description: nodes.description.map(|n| dom.text(&n)),
        button: button.map(|n| ButtonReport {
            text: dom.text(&n),
            visible: !dom.is_hidden(n),
            handlers: dom.click_listener_count(n),
        }),
        notifications,
        location: dom.location(),
        clock_ms: dom.now().as_millis() as u64,
        logs: memory.entries(),
    })
}

/// Run the render command.
pub async fn run(args: RenderArgs, ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let latency = args
        .latency_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.content.latency());

    let source: Rc<dyn ContentSource> = if args.fail_fetch {
        Rc::new(UnavailableSource)
    } else {
        Rc::new(load_source(ctx, args.catalog.as_deref(), latency)?)
    };

    let mut template = HostTemplate::complete(args.block_id.as_deref());
    if args.no_container {
        template = template.without_container();
    }
    if args.no_title {
        template = template.without_title();
    }
    if args.no_description {
        template = template.without_description();
    }
    if args.no_button {
        template = template.without_button();
    }

    let scenario = Scenario {
        template,
        mounts: if args.twice { 2 } else { 1 },
        clicks: args.click,
        advance: Duration::from_millis(args.advance_ms),
    };

    // main installs the tracing subscriber in verbose mode.
    let extra: Option<Rc<dyn LogSink>> = if ctx.output.is_verbose() && !ctx.output.is_json() {
        Some(Rc::new(TracingSink))
    } else {
        None
    };

    ctx.output.debug(&format!("Fetch latency: {}", format_millis(latency.as_millis() as u64)));
    let spinner = ctx.output.spinner("Fetching content...");
    let report = simulate(config, source, &scenario, extra).await;
    spinner.finish_and_clear();
    let report = report?;

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    print_report(&report, ctx);
    Ok(())
}

fn print_report(report: &RenderReport, ctx: &Context) {
    ctx.output.header("Render Result");
    ctx.output.kv("outcome", &origin_badge(&report.outcome));
    if let Some(id) = &report.block_id {
        ctx.output.kv("block", id);
    }
    if let Some(title) = &report.title {
        ctx.output.kv("title", title);
    }
    if let Some(description) = &report.description {
        ctx.output.kv("description", description);
    }
    if let Some(button) = &report.button {
        let state = if button.visible { "visible" } else { "hidden" };
        ctx.output.kv(
            "button",
            &format!("{:?} ({}, {} handler(s))", button.text, state, button.handlers),
        );
    }
    ctx.output.kv("location", &report.location);
    ctx.output.kv("clock", &format_millis(report.clock_ms));

    if !report.notifications.is_empty() {
        ctx.output.header("Notifications");
        for text in &report.notifications {
            ctx.output.list_item(text);
        }
    }

    let problems: Vec<&LogEntry> = report
        .logs
        .iter()
        .filter(|e| e.level >= LogLevel::Warn)
        .collect();
    if !problems.is_empty() {
        ctx.output.header("Diagnostics");
        for entry in problems {
            ctx.output.warn(&entry.to_human());
        }
    }

    if report.block_id.is_none() {
        ctx.output.warn("Nothing was rendered");
    } else {
        ctx.output.success("Block rendered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(template: HostTemplate) -> Scenario {
        Scenario {
            template,
            mounts: 1,
            clicks: 0,
            advance: Duration::ZERO,
        }
    }

    fn catalog() -> Rc<dyn ContentSource> {
        Rc::new(MockContentSource::with_default_catalog().with_latency(Duration::ZERO))
    }

    #[tokio::test]
    async fn test_simulate_default_block() {
        let report = simulate(
            &BlockConfig::default(),
            catalog(),
            &scenario(HostTemplate::complete(None)),
            None,
        )
        .await
        .unwrap();

        assert_eq!(report.outcome, "source");
        assert_eq!(report.block_id.as_deref(), Some("default-block"));
        assert_eq!(report.title.as_deref(), Some("Welcome to Our Platform"));
        let button = report.button.unwrap();
        assert_eq!(button.text, "Learn More");
        assert!(button.visible);
        assert_eq!(button.handlers, 1);
    }

    #[tokio::test]
    async fn test_simulate_twice_with_clicks() {
        let mut s = scenario(HostTemplate::complete(Some("promo-block")));
        s.mounts = 2;
        s.clicks = 1;

        let report = simulate(&BlockConfig::default(), catalog(), &s, None)
            .await
            .unwrap();

        assert_eq!(report.button.unwrap().handlers, 1);
        assert_eq!(report.notifications, vec![click_message("Claim Offer")]);
        assert_eq!(report.location, "/");
    }

    #[tokio::test]
    async fn test_simulate_notifications_expire() {
        let mut s = scenario(HostTemplate::complete(None));
        s.clicks = 2;
        s.advance = Duration::from_millis(2300);

        let report = simulate(&BlockConfig::default(), catalog(), &s, None)
            .await
            .unwrap();

        assert!(report.notifications.is_empty());
        assert_eq!(report.clock_ms, 2300);
    }

    #[tokio::test]
    async fn test_simulate_failed_fetch() {
        let report = simulate(
            &BlockConfig::default(),
            Rc::new(UnavailableSource),
            &scenario(HostTemplate::complete(None)),
            None,
        )
        .await
        .unwrap();

        assert_eq!(report.outcome, "error-fallback");
        assert_eq!(report.title.as_deref(), Some("Error Loading Content"));
        assert!(!report.button.unwrap().visible);
        assert!(report.logs.iter().any(|e| e.level == LogLevel::Error));
    }

    #[tokio::test]
    async fn test_simulate_descendant_container_selector() {
        let mut config = BlockConfig::default();
        config.markup.container = "main [data-content-block]".to_string();
        config.validate().unwrap();

        let report = simulate(
            &config,
            catalog(),
            &scenario(HostTemplate::complete(Some("promo-block"))),
            None,
        )
        .await
        .unwrap();

        assert_eq!(report.outcome, "source");
        assert_eq!(report.title.as_deref(), Some("Limited Time Offer"));
    }

    #[tokio::test]
    async fn test_simulate_missing_container() {
        let report = simulate(
            &BlockConfig::default(),
            catalog(),
            &scenario(HostTemplate::complete(None).without_container()),
            None,
        )
        .await
        .unwrap();

        assert_eq!(report.outcome, "container-missing");
        assert!(report.title.is_none());
        assert!(report.button.is_none());
    }
}
