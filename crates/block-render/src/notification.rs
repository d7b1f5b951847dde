//! Transient notification overlays.
//!
//! Each overlay is an independent state machine:
//!
//! ```text
//! Created --fade-in timer--> FadingIn --transitionend--> Visible
//!    |                          |                          |
//!    +------------- display timer -------------------------+--> FadingOut --transitionend--> Removed
//! ```
//!
//! Removal is driven by the end of the fade-out transition, never by a
//! timer, so the node leaves the document only once it is invisible.

use std::cell::Cell;
use std::rc::Rc;

use block_core::NotificationConfig;
use block_dom::{Dom, DomError};
use block_observability::StructuredLogger;

/// Lifecycle phase of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Created,
    FadingIn,
    Visible,
    FadingOut,
    Removed,
}

/// Inputs that move an overlay through its phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastEvent {
    FadeInTimer,
    DisplayTimer,
    TransitionEnd,
}

impl ToastPhase {
    /// Phase after `event`. Events that do not apply leave the phase as is.
    pub fn on(self, event: ToastEvent) -> Self {
        use ToastEvent::*;
        use ToastPhase::*;

        match (self, event) {
            (Created, FadeInTimer) => FadingIn,
            (FadingIn, TransitionEnd) => Visible,
            // Never became visible, nothing to fade.
            (Created, DisplayTimer) => Removed,
            (FadingIn | Visible, DisplayTimer) => FadingOut,
            (FadingOut, TransitionEnd) => Removed,
            (phase, _) => phase,
        }
    }
}

/// Handle to a shown overlay.
#[derive(Debug, Clone)]
pub struct Toast<N> {
    node: N,
    phase: Rc<Cell<ToastPhase>>,
}

impl<N> Toast<N> {
    /// The overlay element.
    pub fn node(&self) -> &N {
        &self.node
    }

    /// Current phase.
    pub fn phase(&self) -> ToastPhase {
        self.phase.get()
    }
}

/// Shows transient notification overlays.
#[derive(Clone)]
pub struct Notifier<D: Dom> {
    dom: D,
    config: NotificationConfig,
    logger: StructuredLogger,
}

impl<D: Dom> Notifier<D> {
    pub fn new(dom: D, config: NotificationConfig, logger: StructuredLogger) -> Self {
        Self {
            dom,
            config,
            logger: logger.with_component("notifier"),
        }
    }

    /// Append an overlay showing `text` and schedule its fade-in, fade-out
    /// and removal. Every call creates a new, independent overlay.
    pub fn show_message(&self, text: &str) -> Result<Toast<D::Node>, DomError> {
        let node = self.dom.create_element("div")?;
        self.dom.set_class(&node, &self.config.class_name);
        self.dom.set_text(&node, text);

        let transition = format!("opacity {}ms ease", self.config.transition_ms);
        let styles = [
            ("position", "absolute"),
            ("top", "20px"),
            ("right", "20px"),
            ("padding", "12px 20px"),
            ("border-radius", "8px"),
            ("background", "#1e293b"),
            ("color", "#ffffff"),
            ("z-index", "1000"),
            ("opacity", "0"),
            ("transition", transition.as_str()),
        ];
        for (property, value) in styles {
            self.dom.set_style(&node, property, value)?;
        }
        self.dom.append_to_body(&node)?;

        let toast = Toast {
            node,
            phase: Rc::new(Cell::new(ToastPhase::Created)),
        };
        let driver = ToastDriver {
            dom: self.dom.clone(),
            toast: toast.clone(),
            zero_transition: self.config.transition_ms == 0,
            logger: self.logger.clone(),
        };

        let on_end = driver.clone();
        self.dom.on_transition_end(
            &toast.node,
            Box::new(move || on_end.apply(ToastEvent::TransitionEnd)),
        )?;

        let on_fade_in = driver.clone();
        self.dom.set_timeout(
            self.config.fade_in_delay(),
            Box::new(move || on_fade_in.apply(ToastEvent::FadeInTimer)),
        )?;

        self.dom.set_timeout(
            self.config.display(),
            Box::new(move || driver.apply(ToastEvent::DisplayTimer)),
        )?;

        self.logger
            .debug_builder("Notification shown")
            .field("text", text)
            .emit();

        Ok(toast)
    }
}

#[derive(Clone)]
struct ToastDriver<D: Dom> {
    dom: D,
    toast: Toast<D::Node>,
    zero_transition: bool,
    logger: StructuredLogger,
}

impl<D: Dom> ToastDriver<D> {
    fn apply(&self, event: ToastEvent) {
        let current = self.toast.phase.get();
        let next = current.on(event);
        if next == current {
            return;
        }
        self.toast.phase.set(next);

        let result = match next {
            ToastPhase::FadingIn => self.dom.set_style(&self.toast.node, "opacity", "1"),
            ToastPhase::FadingOut => {
                let faded = self.dom.set_style(&self.toast.node, "opacity", "0");
                // No transition means no transitionend will ever arrive.
                if self.zero_transition {
                    self.apply(ToastEvent::TransitionEnd);
                }
                faded
            }
            ToastPhase::Removed => {
                self.dom.remove(&self.toast.node);
                Ok(())
            }
            ToastPhase::Created | ToastPhase::Visible => Ok(()),
        };

        if let Err(e) = result {
            self.logger.error_with("Notification update failed", &[
                ("phase", &next),
                ("error", &e),
            ]);
        }
    }
}
