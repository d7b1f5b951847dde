//! Host page markup contract.

use serde::{Deserialize, Serialize};

/// Selectors and attribute names the host page template must provide.
///
/// The container carries the block id attribute; the three targets are
/// looked up as descendants of the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostMarkup {
    /// Selector for the block container.
    pub container: String,
    /// Attribute on the container holding the block id.
    pub id_attribute: String,
    /// Selector for the title target.
    pub title: String,
    /// Selector for the description target.
    pub description: String,
    /// Selector for the button target.
    pub button: String,
}

impl Default for HostMarkup {
    fn default() -> Self {
        Self {
            container: "[data-content-block]".to_string(),
            id_attribute: "data-block-id".to_string(),
            title: "[data-block-title]".to_string(),
            description: "[data-block-description]".to_string(),
            button: "[data-block-button]".to_string(),
        }
    }
}
