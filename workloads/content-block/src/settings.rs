//! Configuration embedded in the host page.

use block_sdk::block_core::BlockConfig;
use block_sdk::block_dom::Dom;
use block_sdk::block_observability::StructuredLogger;

/// Id of the `<script type="application/json">` element holding the config.
pub const CONFIG_ELEMENT_ID: &str = "block-config";

/// Read the embedded configuration, falling back to defaults when the
/// element is absent or its content does not parse or validate.
pub fn page_config<D: Dom>(dom: &D, logger: &StructuredLogger) -> BlockConfig {
    let selector = format!("script#{}", CONFIG_ELEMENT_ID);
    let node = match dom.query(&selector) {
        Ok(Some(node)) => node,
        Ok(None) => return BlockConfig::default(),
        Err(e) => {
            logger.error_with("Config lookup failed", &[("error", &e)]);
            return BlockConfig::default();
        }
    };

    let text = dom.text(&node);
    let config = match BlockConfig::from_json(&text) {
        Ok(config) => config,
        Err(e) => {
            logger
                .warn_builder("Embedded config is not valid JSON, using defaults")
                .field("error", e.to_string())
                .emit();
            return BlockConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            logger
                .warn_builder("Embedded config rejected, using defaults")
                .field("error", e.to_string())
                .emit();
            BlockConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use block_sdk::block_core::NavigationMode;
    use block_sdk::block_dom::MemoryDom;
    use block_sdk::block_observability::{LogLevel, MemorySink};

    use super::*;

    fn embed(dom: &MemoryDom, json: &str) {
        let script = dom.create_element("script").unwrap();
        dom.set_attribute(script, "id", CONFIG_ELEMENT_ID);
        dom.set_attribute(script, "type", "application/json");
        dom.set_text(&script, json);
        dom.append_to_body(&script).unwrap();
    }

    fn logger(sink: &MemorySink) -> StructuredLogger {
        StructuredLogger::new(Rc::new(sink.clone()))
    }

    #[test]
    fn test_missing_config_element_uses_defaults() {
        let sink = MemorySink::new();
        let config = page_config(&MemoryDom::new(), &logger(&sink));

        assert_eq!(config, BlockConfig::default());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_embedded_config_is_applied() {
        let dom = MemoryDom::new();
        embed(
            &dom,
            r#"{ "navigation": "navigate", "content": { "fallback_block": "promo-block" } }"#,
        );
        let sink = MemorySink::new();

        let config = page_config(&dom, &logger(&sink));

        assert_eq!(config.navigation, NavigationMode::Navigate);
        assert_eq!(config.content.fallback_block, "promo-block");
        assert_eq!(config.notification.display_ms, 2000);
    }

    #[test]
    fn test_malformed_config_warns_and_uses_defaults() {
        let dom = MemoryDom::new();
        embed(&dom, "{ not json");
        let sink = MemorySink::new();

        let config = page_config(&dom, &logger(&sink));

        assert_eq!(config, BlockConfig::default());
        assert!(sink.contains(LogLevel::Warn, "not valid JSON"));
    }

    #[test]
    fn test_invalid_config_warns_and_uses_defaults() {
        let dom = MemoryDom::new();
        embed(&dom, r#"{ "markup": { "container": "" } }"#);
        let sink = MemorySink::new();

        let config = page_config(&dom, &logger(&sink));

        assert_eq!(config, BlockConfig::default());
        assert!(sink.contains(LogLevel::Warn, "rejected"));
    }
}
