//! Block identifier newtype.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier used when the host container carries no block id.
pub const DEFAULT_BLOCK_ID: &str = "default-block";

/// Opaque identifier of a content block instance.
///
/// Only ever used as a lookup key; no format is imposed on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Create a new ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Resolve an ID from a host attribute value.
    ///
    /// Absent and empty values both fall back to `fallback`.
    pub fn from_attribute(value: Option<&str>, fallback: BlockId) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::new(v),
            _ => fallback,
        }
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_ID)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_default() {
        assert_eq!(BlockId::default().as_str(), DEFAULT_BLOCK_ID);
    }

    #[test]
    fn test_block_id_from_attribute_present() {
        let id = BlockId::from_attribute(Some("promo-block"), BlockId::default());
        assert_eq!(id.as_str(), "promo-block");
    }

    #[test]
    fn test_block_id_from_attribute_absent_or_empty() {
        assert_eq!(
            BlockId::from_attribute(None, BlockId::new("fallback")).as_str(),
            "fallback"
        );
        assert_eq!(
            BlockId::from_attribute(Some(""), BlockId::new("fallback")).as_str(),
            "fallback"
        );
    }

    #[test]
    fn test_block_id_is_opaque() {
        let id = BlockId::from("  weird id <with> spaces ");
        assert_eq!(id.to_string(), "  weird id <with> spaces ");
    }

    #[test]
    fn test_block_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&BlockId::new("info-block")).unwrap();
        assert_eq!(json, r#""info-block""#);
    }
}
