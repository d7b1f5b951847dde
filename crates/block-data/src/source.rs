//! The content source capability.

use async_trait::async_trait;
use block_core::{BlockId, ContentPayload};

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Content source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies structured content per block identifier.
///
/// A miss on the identifier is not an error: sources resolve it to a
/// fallback payload. `Err` is reserved for the source itself failing.
#[async_trait(?Send)]
pub trait ContentSource {
    /// Fetch the content for `id`.
    async fn fetch_content(&self, id: &BlockId) -> Result<ContentPayload, FetchError>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "content-source"
    }
}
