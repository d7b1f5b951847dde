//! Content Block - a single CMS-driven block mounted in the browser.
//!
//! This workload demonstrates:
//! - Reading the block id from host markup, with a fixed fallback
//! - Fetching through a `ContentSource` with simulated latency
//! - Rendering with clone-and-replace click handling
//! - Transient notifications on button clicks
//!
//! On wasm32 the module starts itself once the document is ready. Native
//! builds expose the host page template and page configuration loading.

pub mod page;
pub mod settings;

#[cfg(target_arch = "wasm32")]
mod entry;
