//! Renderer, notifications and mounting for the content block.
//!
//! This crate composes the block's three steps:
//! - `BlockMount` - Resolve the block id, fetch, render
//! - `BlockRenderer` - Write a `ContentPayload` into the render targets
//! - `Notifier` - Transient notification overlays

mod mount;
mod notification;
mod renderer;

pub use mount::*;
pub use notification::*;
pub use renderer::*;
