//! Content sources for the content block renderer.
//!
//! This crate provides:
//! - `ContentSource` - The capability the renderer fetches content through
//! - `FetchError` - Failures a content source may report
//! - `MockContentSource` - Static catalog with artificial latency
//! - `Delay` - Platform timer used to simulate latency

mod delay;
mod mock;
mod source;

pub use delay::*;
pub use mock::*;
pub use source::*;
