//! Error types for the content block renderer.

use thiserror::Error;

/// Errors raised while mounting a block.
#[derive(Debug, Error)]
pub enum BlockError {
    /// The host page has no element matching the container selector.
    #[error("Block container not found: {0}")]
    ContainerNotFound(String),

    /// Content could not be fetched.
    #[error("Content fetch failed for '{block}': {reason}")]
    FetchFailed { block: String, reason: String },

    /// A DOM operation failed.
    #[error("DOM error: {0}")]
    Dom(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
