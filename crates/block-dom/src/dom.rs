//! The document abstraction the renderer is written against.

use std::fmt;
use std::time::Duration;

/// Event listener callback. May run many times.
pub type Listener = Box<dyn FnMut()>;

/// Timer callback. Runs once.
pub type Callback = Box<dyn FnOnce()>;

/// Errors raised by DOM backends.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomError {
    #[error("Invalid selector: '{0}'")]
    InvalidSelector(String),

    #[error("Node is not attached to a parent")]
    Detached,

    #[error("Node has been removed")]
    Removed,

    #[error("Document has no body")]
    NoBody,

    #[error("No window available")]
    NoWindow,

    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Access to a document.
///
/// Handles are cheap to clone and share the same document, so callbacks
/// can capture a clone and mutate the page later. Every method takes
/// `&self`; backends use interior mutability.
pub trait Dom: Clone + 'static {
    /// Element handle.
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    /// First element in the document matching `selector`.
    fn query(&self, selector: &str) -> Result<Option<Self::Node>, DomError>;

    /// First descendant of `scope` matching `selector`.
    fn query_within(
        &self,
        scope: &Self::Node,
        selector: &str,
    ) -> Result<Option<Self::Node>, DomError>;

    /// Attribute value, if the attribute is present.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Text content of the element and its descendants.
    fn text(&self, node: &Self::Node) -> String;

    /// Replace the element's content with `text`.
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Show or hide the element.
    fn set_hidden(&self, node: &Self::Node, hidden: bool);

    /// Set an inline style property.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> Result<(), DomError>;

    /// Set the element's class attribute.
    fn set_class(&self, node: &Self::Node, class: &str);

    /// Create a detached element.
    fn create_element(&self, tag: &str) -> Result<Self::Node, DomError>;

    /// Append an element to the document body.
    fn append_to_body(&self, node: &Self::Node) -> Result<(), DomError>;

    /// Detach an element from the document and drop every listener
    /// registered on it or its descendants.
    fn remove(&self, node: &Self::Node);

    /// Replace `node` in its parent with a deep clone of itself and return
    /// the clone. Event listeners are not carried over to the clone, and
    /// the ones registered on `node` are dropped.
    fn replace_with_clone(&self, node: &Self::Node) -> Result<Self::Node, DomError>;

    /// Register a click listener.
    fn on_click(&self, node: &Self::Node, listener: Listener) -> Result<(), DomError>;

    /// Register a `transitionend` listener.
    fn on_transition_end(&self, node: &Self::Node, listener: Listener) -> Result<(), DomError>;

    /// Run `callback` once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: Callback) -> Result<(), DomError>;

    /// Point the page at `url`.
    fn navigate(&self, url: &str) -> Result<(), DomError>;
}
