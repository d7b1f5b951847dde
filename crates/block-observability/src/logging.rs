//! Structured logging with block context.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use block_core::{BlockId, LoggingConfig};
use serde::Serialize;

use crate::sink::{LogSink, StderrSink};

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Unknown level or format name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown {kind}: '{value}'")]
pub struct ParseLogSettingError {
    kind: &'static str,
    value: String,
}

impl FromStr for LogLevel {
    type Err = ParseLogSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ParseLogSettingError {
                kind: "log level",
                value: s.to_string(),
            }),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format (for production/log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

impl FromStr for LogFormat {
    type Err = ParseLogSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "human" => Ok(Self::Human),
            _ => Err(ParseLogSettingError {
                kind: "log format",
                value: s.to_string(),
            }),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Block the entry belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    /// Emitting component (renderer, notifier, mount...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Position of the entry in this logger's output.
    pub seq: u64,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}", self.level, self.message);

        if let Some(component) = &self.component {
            s = format!("[{}] {}: {}", self.level, component, self.message);
        }

        if let Some(block) = &self.block {
            s.push_str(&format!(" (block={})", block));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }

    /// Format according to `format`.
    pub fn render(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Json => self.to_json(),
            LogFormat::Human => self.to_human(),
        }
    }

    /// Look up a field value.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

/// Structured logger with block context.
///
/// Cloning is cheap; clones share the sink and the sequence counter, so
/// entries from a logger and its scoped children stay ordered.
#[derive(Clone)]
pub struct StructuredLogger {
    block: Option<String>,
    component: Option<String>,
    min_level: LogLevel,
    format: LogFormat,
    sink: Rc<dyn LogSink>,
    seq: Rc<Cell<u64>>,
}

impl fmt::Debug for StructuredLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredLogger")
            .field("block", &self.block)
            .field("component", &self.component)
            .field("min_level", &self.min_level)
            .field("format", &self.format)
            .finish()
    }
}

impl StructuredLogger {
    /// Create a new logger writing to `sink`.
    pub fn new(sink: Rc<dyn LogSink>) -> Self {
        Self {
            block: None,
            component: None,
            min_level: LogLevel::Info,
            format: LogFormat::Json,
            sink,
            seq: Rc::new(Cell::new(0)),
        }
    }

    /// Create a logger writing to stderr.
    pub fn stderr() -> Self {
        Self::new(Rc::new(StderrSink))
    }

    /// Create a logger from configuration. Unknown names keep the defaults.
    pub fn from_config(config: &LoggingConfig, sink: Rc<dyn LogSink>) -> Self {
        let mut logger = Self::new(sink);
        if let Ok(level) = config.level.parse() {
            logger.min_level = level;
        }
        if let Ok(format) = config.format.parse() {
            logger.format = format;
        }
        logger
    }

    /// Set the block context.
    pub fn with_block(mut self, block: &BlockId) -> Self {
        self.block = Some(block.to_string());
        self
    }

    /// Set the emitting component.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Log at trace level.
    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message, BTreeMap::new());
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    /// Log at error level with fields.
    pub fn error_with(&self, message: &str, fields: &[(&str, &dyn fmt::Debug)]) {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::json!(format!("{:?}", v))))
            .collect();
        self.log(LogLevel::Error, message, fields);
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        if level < self.min_level {
            return;
        }

        let seq = self.seq.get();
        self.seq.set(seq + 1);

        let entry = LogEntry {
            level,
            message: message.to_string(),
            block: self.block.clone(),
            component: self.component.clone(),
            fields,
            seq,
        };

        self.sink.write(&entry, self.format);
    }

    /// Get the block context.
    pub fn block(&self) -> Option<&str> {
        self.block.as_deref()
    }

    /// Get the minimum level.
    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    /// Create a new log builder.
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add an integer field.
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a boolean field.
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a duration field (in milliseconds).
    pub fn duration_ms(mut self, key: &str, duration: std::time::Duration) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(duration.as_millis() as u64));
        self
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    /// Start building an info log entry.
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    /// Start building a warn log entry.
    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn memory_logger() -> (StructuredLogger, MemorySink) {
        let sink = MemorySink::new();
        let logger = StructuredLogger::new(Rc::new(sink.clone()));
        (logger, sink)
    }

    // === Level Filtering ===

    #[test]
    fn test_logger_filters_below_min_level() {
        let (logger, sink) = memory_logger();
        let logger = logger.with_min_level(LogLevel::Warn);

        logger.info("hidden");
        logger.warn("shown");
        logger.error("also shown");

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert_eq!(entries[1].level, LogLevel::Error);
    }

    #[test]
    fn test_logger_sequence_shared_between_clones() {
        let (logger, sink) = memory_logger();
        let child = logger.clone().with_component("renderer");

        logger.info("first");
        child.info("second");
        logger.info("third");

        let seqs: Vec<u64> = sink.entries().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    // === Context ===

    #[test]
    fn test_logger_context_fields() {
        let (logger, sink) = memory_logger();
        let logger = logger
            .with_block(&BlockId::new("promo-block"))
            .with_component("mount");

        logger.info("mounted");

        let entry = &sink.entries()[0];
        assert_eq!(entry.block.as_deref(), Some("promo-block"));
        assert_eq!(entry.component.as_deref(), Some("mount"));
    }

    #[test]
    fn test_log_builder_fields() {
        let (logger, sink) = memory_logger();

        logger
            .warn_builder("slow fetch")
            .field("source", "mock")
            .field_u64("attempt", 1)
            .field_bool("fallback", true)
            .duration_ms("latency", std::time::Duration::from_millis(500))
            .emit();

        let entry = &sink.entries()[0];
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.field("source"), Some(&serde_json::json!("mock")));
        assert_eq!(entry.field("attempt"), Some(&serde_json::json!(1)));
        assert_eq!(entry.field("fallback"), Some(&serde_json::json!(true)));
        assert_eq!(entry.field("latency"), Some(&serde_json::json!(500)));
    }

    // === Formatting ===

    #[test]
    fn test_entry_to_json() {
        let (logger, sink) = memory_logger();
        logger.with_block(&BlockId::new("b")).error("boom");

        let json: serde_json::Value =
            serde_json::from_str(&sink.entries()[0].to_json()).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["message"], "boom");
        assert_eq!(json["block"], "b");
        assert!(json.get("component").is_none());
    }

    #[test]
    fn test_entry_to_human() {
        let (logger, sink) = memory_logger();
        logger
            .with_component("renderer")
            .warn_builder("title missing")
            .field("target", "title")
            .emit();

        let human = sink.entries()[0].to_human();
        assert_eq!(human, r#"[WARN] renderer: title missing | target="title""#);
    }

    // === Config ===

    #[test]
    fn test_parse_level_and_format() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("HUMAN".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_logger_from_config() {
        let config = LoggingConfig {
            level: "error".to_string(),
            format: "human".to_string(),
        };
        let sink = MemorySink::new();
        let logger = StructuredLogger::from_config(&config, Rc::new(sink.clone()));

        assert_eq!(logger.min_level(), LogLevel::Error);
        logger.warn("dropped");
        assert!(sink.is_empty());
    }
}
