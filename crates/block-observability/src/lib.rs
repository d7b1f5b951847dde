//! Structured logging for the content block renderer.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with block context
//! - `LogBuilder` - Fluent construction of entries with fields
//! - `LogSink` - Output backends (stderr, browser console, memory, tracing)

mod logging;
mod sink;

pub use logging::*;
pub use sink::*;

pub use block_core::BlockId;
