//! Structured content for a single block.

use serde::{Deserialize, Serialize};

use crate::ids::BlockId;

/// Content returned by a content source for one block.
///
/// The JSON shape matches what a CMS endpoint returns:
/// `{ "title", "description", "buttonText"?, "buttonLink"? }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_link: Option<String>,
}

impl ContentPayload {
    /// Create a payload without a call-to-action.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            button_text: None,
            button_link: None,
        }
    }

    /// Attach a call-to-action button.
    pub fn with_button(mut self, text: impl Into<String>) -> Self {
        self.button_text = Some(text.into());
        self
    }

    /// Attach a link to the call-to-action button.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.button_link = Some(link.into());
        self
    }

    /// Fallback payload for an identifier the source has no entry for.
    pub fn not_found(id: &BlockId) -> Self {
        Self::new(
            format!("Content Not Found: {}", id),
            "The requested content could not be found.",
        )
    }

    /// Button text, if present and non-empty.
    pub fn button_text(&self) -> Option<&str> {
        self.button_text.as_deref().filter(|t| !t.is_empty())
    }

    /// Button link, if present and non-empty.
    pub fn button_link(&self) -> Option<&str> {
        self.button_link.as_deref().filter(|l| !l.is_empty())
    }

    /// Whether the payload carries a call-to-action.
    pub fn has_button(&self) -> bool {
        self.button_text().is_some()
    }
}
