//! Public SDK for embedding the content block renderer.
//!
//! This crate re-exports all renderer functionality:
//!
//! ```ignore
//! use block_sdk::prelude::*;
//!
//! async fn mount(dom: BrowserDom) -> MountOutcome {
//!     let config = BlockConfig::default();
//!     let logger = StructuredLogger::from_config(&config.logging, Rc::new(ConsoleSink));
//!     let source = Rc::new(MockContentSource::with_default_catalog());
//!
//!     BlockMount::new(dom, source, config, logger).run().await
//! }
//! ```

pub use block_core;
pub use block_data;
pub use block_dom;
pub use block_observability;
pub use block_render;

/// Prelude for convenient imports.
pub mod prelude {
    pub use block_core::*;
    pub use block_data::*;
    pub use block_dom::*;
    pub use block_observability::*;
    pub use block_render::*;
}
