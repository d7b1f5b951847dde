//! Core types for the content block renderer.
//!
//! This crate provides the fundamental types shared by every layer:
//! - `BlockId` - Opaque block identifier read from host markup
//! - `ContentPayload` - Structured content for one block
//! - `HostMarkup` - Selectors and attributes of the host page contract
//! - `BlockConfig` - Serde-backed configuration
//! - `BlockError` / `ConfigError` - Error types

mod config;
mod error;
mod ids;
mod markup;
mod payload;

pub use config::*;
pub use error::*;
pub use ids::*;
pub use markup::*;
pub use payload::*;
