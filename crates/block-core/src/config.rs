//! Block renderer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ids::{BlockId, DEFAULT_BLOCK_ID};
use crate::markup::HostMarkup;
use crate::payload::ContentPayload;

/// Full configuration for a mounted block.
///
/// Every section is optional in the file; missing values take the defaults
/// the block ships with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// What a button click does with `buttonLink`.
    pub navigation: NavigationMode,
    /// Host markup contract.
    pub markup: HostMarkup,
    /// Content source settings.
    pub content: ContentConfig,
    /// Placeholder texts.
    pub defaults: DefaultTexts,
    /// Transient notification timing.
    pub notification: NotificationConfig,
    /// Logger settings.
    pub logging: LoggingConfig,
}

impl BlockConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;

        let config = if path.ends_with(".json") {
            Self::from_json(&content).map_err(|source| ConfigError::Json {
                path: path.to_string(),
                source,
            })?
        } else {
            Self::from_toml(&content).map_err(|source| ConfigError::Toml {
                path: path.to_string(),
                source,
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Parse config from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let selectors = [
            ("markup.container", &self.markup.container),
            ("markup.id_attribute", &self.markup.id_attribute),
            ("markup.title", &self.markup.title),
            ("markup.description", &self.markup.description),
            ("markup.button", &self.markup.button),
        ];
        if let Some((name, _)) = selectors.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
        }

        if self.content.fallback_block.is_empty() {
            return Err(ConfigError::Invalid(
                "content.fallback_block must not be empty".to_string(),
            ));
        }

        if !LoggingConfig::LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {:?}, got '{}'",
                LoggingConfig::LEVELS,
                self.logging.level
            )));
        }

        if !LoggingConfig::FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be one of {:?}, got '{}'",
                LoggingConfig::FORMATS,
                self.logging.format
            )));
        }

        Ok(())
    }
}

/// Content source settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Block id used when the container has no id attribute.
    pub fallback_block: String,
    /// Artificial latency of the mock source, in milliseconds.
    pub latency_ms: u64,
}

impl ContentConfig {
    /// The fallback block id.
    pub fn fallback_id(&self) -> BlockId {
        BlockId::new(self.fallback_block.clone())
    }

    /// Artificial latency as a `Duration`.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            fallback_block: DEFAULT_BLOCK_ID.to_string(),
            latency_ms: 500,
        }
    }
}

/// Placeholder texts substituted for missing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultTexts {
    /// Title shown when the payload has none.
    pub title: String,
    /// Description shown when the payload has none.
    pub description: String,
    /// Title of the payload rendered when the fetch fails.
    pub error_title: String,
    /// Description of the payload rendered when the fetch fails.
    pub error_description: String,
}

impl DefaultTexts {
    /// Payload rendered in place of content that failed to load.
    pub fn error_payload(&self) -> ContentPayload {
        ContentPayload::new(self.error_title.clone(), self.error_description.clone())
    }
}

impl Default for DefaultTexts {
    fn default() -> Self {
        Self {
            title: "Default Title".to_string(),
            description: "Default description.".to_string(),
            error_title: "Error Loading Content".to_string(),
            error_description: "Sorry, we couldn't load this content. Please try again later."
                .to_string(),
        }
    }
}

/// Timing of the transient notification overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Delay before the fade-in starts, in milliseconds.
    pub fade_in_delay_ms: u64,
    /// Time from creation until the fade-out starts, in milliseconds.
    pub display_ms: u64,
    /// Length of the opacity transition, in milliseconds.
    pub transition_ms: u64,
    /// CSS class put on the overlay node.
    pub class_name: String,
}

impl NotificationConfig {
    pub fn fade_in_delay(&self) -> Duration {
        Duration::from_millis(self.fade_in_delay_ms)
    }

    pub fn display(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            fade_in_delay_ms: 10,
            display_ms: 2000,
            transition_ms: 300,
            class_name: "block-toast".to_string(),
        }
    }
}

/// Behavior of a button click when the payload carries a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationMode {
    /// Log the navigation intent only.
    #[default]
    LogOnly,
    /// Set the page location to the link.
    Navigate,
}

/// Logger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error.
    pub level: String,
    /// Output format: json or human.
    pub format: String,
}

impl LoggingConfig {
    pub const LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];
    pub const FORMATS: [&'static str; 2] = ["json", "human"];
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // === Defaults ===

    #[test]
    fn test_config_defaults() {
        let config = BlockConfig::default();

        assert_eq!(config.markup.container, "[data-content-block]");
        assert_eq!(config.markup.id_attribute, "data-block-id");
        assert_eq!(config.content.fallback_block, DEFAULT_BLOCK_ID);
        assert_eq!(config.content.latency(), Duration::from_millis(500));
        assert_eq!(config.notification.fade_in_delay(), Duration::from_millis(10));
        assert_eq!(config.notification.display(), Duration::from_millis(2000));
        assert_eq!(config.navigation, NavigationMode::LogOnly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_error_payload_has_no_button() {
        let payload = DefaultTexts::default().error_payload();
        assert_eq!(payload.title, "Error Loading Content");
        assert!(!payload.has_button());
    }

    // === Parsing ===

    #[test]
    fn test_config_from_toml_partial() {
        let config = BlockConfig::from_toml(
            r#"
navigation = "navigate"

[content]
latency_ms = 50

[notification]
display_ms = 1000
"#,
        )
        .unwrap();

        assert_eq!(config.navigation, NavigationMode::Navigate);
        assert_eq!(config.content.latency_ms, 50);
        assert_eq!(config.content.fallback_block, DEFAULT_BLOCK_ID);
        assert_eq!(config.notification.display_ms, 1000);
        assert_eq!(config.notification.fade_in_delay_ms, 10);
    }

    #[test]
    fn test_config_from_json() {
        let config =
            BlockConfig::from_json(r#"{"defaults": {"title": "Untitled"}}"#).unwrap();

        assert_eq!(config.defaults.title, "Untitled");
        assert_eq!(config.defaults.description, "Default description.");
    }

    // === Validation ===

    #[test]
    fn test_config_rejects_empty_selector() {
        let mut config = BlockConfig::default();
        config.markup.button = " ".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("markup.button"));
    }

    #[test]
    fn test_config_rejects_unknown_log_level() {
        let mut config = BlockConfig::default();
        config.logging.level = "loud".to_string();

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    // === Loading ===

    #[test]
    fn test_config_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[content]\nfallback_block = \"promo-block\"").unwrap();

        let config = BlockConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.content.fallback_id(), BlockId::new("promo-block"));
    }

    #[test]
    fn test_config_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"logging": {{"format": "human"}}}}"#).unwrap();

        let config = BlockConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.logging.format, "human");
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = BlockConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[content\nlatency_ms = ").unwrap();

        let err = BlockConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }
}
