//! Block initialization: find the container, fetch, render.

use std::fmt;
use std::rc::Rc;

use block_core::{BlockConfig, BlockError, BlockId, ContentPayload};
use block_data::ContentSource;
use block_dom::Dom;
use block_observability::StructuredLogger;

use crate::renderer::{BlockRenderer, RenderTargets};

/// Where the rendered payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadOrigin {
    /// The content source resolved.
    Source,
    /// The content source failed; the configured error payload was rendered.
    ErrorFallback,
}

impl fmt::Display for PayloadOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadOrigin::Source => write!(f, "source"),
            PayloadOrigin::ErrorFallback => write!(f, "error-fallback"),
        }
    }
}

/// Result of a mount attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    Rendered {
        block_id: BlockId,
        origin: PayloadOrigin,
    },
    /// No container on the page; nothing was fetched or rendered.
    ContainerMissing,
    /// Mounting stopped before fetching for another reason, such as an
    /// unparseable container selector.
    Failed { reason: String },
}

impl MountOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, MountOutcome::Rendered { .. })
    }
}

/// Mounts one content block onto a page.
pub struct BlockMount<D: Dom> {
    dom: D,
    source: Rc<dyn ContentSource>,
    config: BlockConfig,
    logger: StructuredLogger,
}

impl<D: Dom> BlockMount<D> {
    pub fn new(
        dom: D,
        source: Rc<dyn ContentSource>,
        config: BlockConfig,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            dom,
            source,
            config,
            logger,
        }
    }

    /// Run the mount. Failures never escape: a missing container is logged
    /// and reported, a failed fetch renders the error payload.
    pub async fn run(&self) -> MountOutcome {
        let logger = self.logger.clone().with_component("mount");
        match self.try_run().await {
            Ok(outcome) => outcome,
            Err(BlockError::ContainerNotFound(selector)) => {
                logger.error_with("Block mount stopped", &[("container", &selector)]);
                MountOutcome::ContainerMissing
            }
            Err(e) => {
                let reason = e.to_string();
                logger.error_with("Block mount failed", &[("error", &reason)]);
                MountOutcome::Failed { reason }
            }
        }
    }

    async fn try_run(&self) -> Result<MountOutcome, BlockError> {
        let markup = &self.config.markup;
        let container = self
            .dom
            .query(&markup.container)
            .map_err(|e| BlockError::Dom(e.to_string()))?
            .ok_or_else(|| BlockError::ContainerNotFound(markup.container.clone()))?;

        let attribute = self.dom.attribute(&container, &markup.id_attribute);
        let block_id =
            BlockId::from_attribute(attribute.as_deref(), self.config.content.fallback_id());
        let logger = self.logger.clone().with_block(&block_id);
        let mount_logger = logger.clone().with_component("mount");

        mount_logger
            .debug_builder("Fetching content")
            .field("source", self.source.name())
            .emit();

        let (payload, origin) = match self.source.fetch_content(&block_id).await {
            Ok(payload) => (payload, PayloadOrigin::Source),
            Err(e) => {
                let err = BlockError::FetchFailed {
                    block: block_id.to_string(),
                    reason: e.to_string(),
                };
                mount_logger.error_with("Failed to load content", &[("error", &err.to_string())]);
                (self.config.defaults.error_payload(), PayloadOrigin::ErrorFallback)
            }
        };

        // Resolved after the fetch; the page may have changed while waiting.
        let mut targets = match RenderTargets::resolve(&self.dom, &container, markup) {
            Ok(targets) => targets,
            Err(e) => {
                mount_logger.error_with("Failed to resolve render targets", &[("error", &e)]);
                RenderTargets::default()
            }
        };

        let renderer = BlockRenderer::new(self.dom.clone(), &self.config, logger);
        renderer.render(&mut targets, &payload);

        mount_logger
            .info_builder("Block rendered")
            .field("origin", origin.to_string())
            .field_bool("button", targets.button.is_some() && payload.has_button())
            .emit();

        Ok(MountOutcome::Rendered { block_id, origin })
    }
}

/// Render `payload` into the block container on the page, without fetching.
pub fn render_into_page<D: Dom>(
    dom: &D,
    config: &BlockConfig,
    payload: &ContentPayload,
    logger: StructuredLogger,
) -> Result<RenderTargets<D::Node>, BlockError> {
    let container = dom
        .query(&config.markup.container)
        .map_err(|e| BlockError::Dom(e.to_string()))?
        .ok_or_else(|| BlockError::ContainerNotFound(config.markup.container.clone()))?;
    let mut targets = RenderTargets::resolve(dom, &container, &config.markup)
        .map_err(|e| BlockError::Dom(e.to_string()))?;
    BlockRenderer::new(dom.clone(), config, logger).render(&mut targets, payload);
    Ok(targets)
}
