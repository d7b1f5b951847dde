//! Writes a `ContentPayload` into the block's render targets.

use block_core::{BlockConfig, ContentPayload, DefaultTexts, HostMarkup, NavigationMode};
use block_dom::{Dom, DomError};
use block_observability::StructuredLogger;

use crate::notification::Notifier;

/// The three insertion points inside a block container. Any of them may be
/// absent from the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTargets<N> {
    pub title: Option<N>,
    pub description: Option<N>,
    pub button: Option<N>,
}

impl<N: Clone> RenderTargets<N> {
    /// Look the targets up under `container`.
    pub fn resolve<D>(dom: &D, container: &N, markup: &HostMarkup) -> Result<Self, DomError>
    where
        D: Dom<Node = N>,
    {
        Ok(Self {
            title: dom.query_within(container, &markup.title)?,
            description: dom.query_within(container, &markup.description)?,
            button: dom.query_within(container, &markup.button)?,
        })
    }
}

impl<N> Default for RenderTargets<N> {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            button: None,
        }
    }
}

/// Message shown when a rendered button is clicked.
pub fn click_message(button_text: &str) -> String {
    format!("Button \"{}\" clicked!", button_text)
}

/// Renders payloads into targets.
///
/// `render` overwrites text, visibility and the click handler of every
/// target on each call. The button node is replaced by a fresh clone before
/// a handler is attached, so repeated renders never stack handlers.
#[derive(Clone)]
pub struct BlockRenderer<D: Dom> {
    dom: D,
    notifier: Notifier<D>,
    defaults: DefaultTexts,
    navigation: NavigationMode,
    logger: StructuredLogger,
}

impl<D: Dom> BlockRenderer<D> {
    pub fn new(dom: D, config: &BlockConfig, logger: StructuredLogger) -> Self {
        let notifier = Notifier::new(dom.clone(), config.notification.clone(), logger.clone());
        Self {
            dom,
            notifier,
            defaults: config.defaults.clone(),
            navigation: config.navigation,
            logger: logger.with_component("renderer"),
        }
    }

    pub fn notifier(&self) -> &Notifier<D> {
        &self.notifier
    }

    /// Render `payload` into `targets`. When the button is replaced,
    /// `targets.button` is rebound to the replacement.
    pub fn render(&self, targets: &mut RenderTargets<D::Node>, payload: &ContentPayload) {
        self.render_text(
            "title",
            targets.title.as_ref(),
            &payload.title,
            &self.defaults.title,
        );
        self.render_text(
            "description",
            targets.description.as_ref(),
            &payload.description,
            &self.defaults.description,
        );
        self.render_button(targets, payload);
    }

    fn render_text(&self, target: &str, node: Option<&D::Node>, value: &str, default: &str) {
        match node {
            Some(node) if !value.is_empty() => self.dom.set_text(node, value),
            Some(node) => {
                self.dom.set_text(node, default);
                self.logger
                    .warn_builder(format!("Missing {} data, using default text", target))
                    .field("target", target)
                    .field("reason", "empty_value")
                    .emit();
            }
            None => {
                self.logger
                    .warn_builder(format!("Render target not found: {}", target))
                    .field("target", target)
                    .field("reason", "missing_target")
                    .emit();
            }
        }
    }

    fn render_button(&self, targets: &mut RenderTargets<D::Node>, payload: &ContentPayload) {
        let Some(button) = targets.button.clone() else {
            return;
        };

        let Some(text) = payload.button_text() else {
            self.dom.set_hidden(&button, true);
            return;
        };

        self.dom.set_text(&button, text);
        self.dom.set_hidden(&button, false);

        let fresh = match self.dom.replace_with_clone(&button) {
            Ok(fresh) => fresh,
            Err(e) => {
                self.logger.error_with("Failed to replace button", &[("error", &e)]);
                return;
            }
        };
        targets.button = Some(fresh.clone());

        let handler = ClickHandler {
            dom: self.dom.clone(),
            notifier: self.notifier.clone(),
            text: text.to_string(),
            link: payload.button_link().map(str::to_string),
            navigation: self.navigation,
            logger: self.logger.clone(),
        };
        if let Err(e) = self.dom.on_click(&fresh, Box::new(move || handler.handle())) {
            self.logger.error_with("Failed to attach click handler", &[("error", &e)]);
        }
    }
}

struct ClickHandler<D: Dom> {
    dom: D,
    notifier: Notifier<D>,
    text: String,
    link: Option<String>,
    navigation: NavigationMode,
    logger: StructuredLogger,
}

impl<D: Dom> ClickHandler<D> {
    fn handle(&self) {
        if let Some(link) = &self.link {
            match self.navigation {
                NavigationMode::LogOnly => {
                    self.logger
                        .info_builder("Navigation requested")
                        .field("link", link.as_str())
                        .field("button", self.text.as_str())
                        .emit();
                }
                NavigationMode::Navigate => {
                    self.logger
                        .info_builder("Navigating")
                        .field("link", link.as_str())
                        .emit();
                    if let Err(e) = self.dom.navigate(link) {
                        self.logger.error_with("Navigation failed", &[("error", &e)]);
                    }
                }
            }
        }

        if let Err(e) = self.notifier.show_message(&click_message(&self.text)) {
            self.logger.error_with("Failed to show notification", &[("error", &e)]);
        }
    }
}
