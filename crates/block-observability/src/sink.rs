//! Log output backends.

use std::cell::RefCell;
use std::rc::Rc;

use crate::logging::{LogEntry, LogFormat, LogLevel};

/// Destination for formatted log entries.
pub trait LogSink {
    /// Write one entry.
    fn write(&self, entry: &LogEntry, format: LogFormat);
}

/// Writes entries to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write(&self, entry: &LogEntry, format: LogFormat) {
        eprintln!("{}", entry.render(format));
    }
}

/// Writes entries to the browser console, picking the console method by
/// level so warnings and errors show up as such in devtools.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

#[cfg(target_arch = "wasm32")]
impl LogSink for ConsoleSink {
    fn write(&self, entry: &LogEntry, format: LogFormat) {
        let line = wasm_bindgen::JsValue::from_str(&entry.render(format));
        match entry.level {
            LogLevel::Error => web_sys::console::error_1(&line),
            LogLevel::Warn => web_sys::console::warn_1(&line),
            LogLevel::Info => web_sys::console::info_1(&line),
            LogLevel::Debug | LogLevel::Trace => web_sys::console::debug_1(&line),
        }
    }
}

/// Keeps entries in memory.
///
/// Clones share the same buffer, so a test can hand one clone to the logger
/// and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Rc<RefCell<Vec<LogEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of captured entries.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    /// Captured entries at `level`.
    pub fn at_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    /// Whether any entry at `level` contains `needle` in its message.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl LogSink for MemorySink {
    fn write(&self, entry: &LogEntry, _format: LogFormat) {
        self.entries.borrow_mut().push(entry.clone());
    }
}

/// Forwards entries to `tracing`, for hosts that install a subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, entry: &LogEntry, _format: LogFormat) {
        let block = entry.block.as_deref().unwrap_or("-");
        let component = entry.component.as_deref().unwrap_or("-");
        let fields = serde_json::to_string(&entry.fields).unwrap_or_default();

        match entry.level {
            LogLevel::Error => {
                tracing::error!(block, component, fields = %fields, "{}", entry.message)
            }
            LogLevel::Warn => {
                tracing::warn!(block, component, fields = %fields, "{}", entry.message)
            }
            LogLevel::Info => {
                tracing::info!(block, component, fields = %fields, "{}", entry.message)
            }
            LogLevel::Debug => {
                tracing::debug!(block, component, fields = %fields, "{}", entry.message)
            }
            LogLevel::Trace => {
                tracing::trace!(block, component, fields = %fields, "{}", entry.message)
            }
        }
    }
}

/// Sends every entry to each wrapped sink in order.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Rc<dyn LogSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Rc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl LogSink for FanoutSink {
    fn write(&self, entry: &LogEntry, format: LogFormat) {
        for sink in &self.sinks {
            sink.write(entry, format);
        }
    }
}
