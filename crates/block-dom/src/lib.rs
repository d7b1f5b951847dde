//! DOM access for the content block renderer.
//!
//! The renderer only ever talks to the page through the `Dom` trait:
//! - `MemoryDom` - In-memory document with a virtual clock, for native
//!   hosts and tests
//! - `BrowserDom` - `web-sys` backed document (wasm32 only)
//! - `Selector` - The selector subset both backends agree on
//! - `HostTemplate` - Builds host markup that honors a `HostMarkup` contract

mod clock;
mod dom;
mod memory;
mod selector;
mod template;

#[cfg(target_arch = "wasm32")]
mod browser;

pub use clock::*;
pub use dom::*;
pub use memory::*;
pub use selector::*;
pub use template::*;

#[cfg(target_arch = "wasm32")]
pub use browser::*;
