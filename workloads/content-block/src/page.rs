//! Host page that honors the block markup contract.

use block_sdk::block_core::{BlockConfig, HostMarkup};
use block_sdk::block_dom::{Compound, DomError, Selector};

use crate::settings::CONFIG_ELEMENT_ID;

const PAGE_STYLES: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; padding: 48px; background: #f8fafc; color: #0f172a; }
[data-content-block] { max-width: 640px; margin: 0 auto; padding: 32px; border-radius: 12px; background: #ffffff; box-shadow: 0 1px 3px rgba(15, 23, 42, 0.1); }
[data-block-title] { margin: 0 0 12px; font-size: 1.75rem; }
[data-block-description] { margin: 0 0 24px; line-height: 1.6; color: #475569; }
[data-block-button] { padding: 10px 20px; border: 0; border-radius: 8px; background: #2563eb; color: #ffffff; font-size: 1rem; cursor: pointer; }
[hidden] { display: none !important; }
.block-toast { font-size: 0.95rem; box-shadow: 0 4px 12px rgba(15, 23, 42, 0.25); }
"#;

/// A complete HTML page hosting one content block.
#[derive(Debug, Clone)]
pub struct HostPage {
    title: String,
    block_id: Option<String>,
    markup: HostMarkup,
    config: Option<BlockConfig>,
    script: String,
}

impl HostPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            block_id: None,
            markup: HostMarkup::default(),
            config: None,
            script: "./pkg/content_block.js".to_string(),
        }
    }

    /// Value of the block id attribute on the container.
    pub fn with_block_id(mut self, id: impl Into<String>) -> Self {
        self.block_id = Some(id.into());
        self
    }

    pub fn with_markup(mut self, markup: HostMarkup) -> Self {
        self.markup = markup;
        self
    }

    /// Embed `config` for the module to pick up at start.
    pub fn with_config(mut self, config: BlockConfig) -> Self {
        self.markup = config.markup.clone();
        self.config = Some(config);
        self
    }

    /// Path of the generated JS glue module.
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    /// Render the page. Fails only when a markup selector is invalid.
    pub fn render(&self) -> Result<String, DomError> {
        let mut container_attrs = Vec::new();
        if let Some(id) = &self.block_id {
            container_attrs.push((self.markup.id_attribute.clone(), id.clone()));
        }

        let parts = [
            element(&self.markup.title, "h2", &[], "")?,
            element(&self.markup.description, "p", &[], "")?,
            element(&self.markup.button, "button", &[("type".to_string(), "button".to_string())], "")?,
        ];
        let inner = format!("\n    {}\n", parts.join("\n    "));
        let block = element(&self.markup.container, "section", &container_attrs, &inner)?;

        let config = match &self.config {
            Some(config) => format!(
                "<script type=\"application/json\" id=\"{}\">{}</script>\n",
                CONFIG_ELEMENT_ID,
                script_safe(&serde_json::to_string(config).unwrap_or_default())
            ),
            None => String::new(),
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{styles}</style>
</head>
<body>
{block}
{config}<script type="module">
import init from "{script}";
init();
</script>
</body>
</html>
"#,
            title = html_escape(&self.title),
            styles = PAGE_STYLES,
            block = block,
            config = config,
            script = html_escape(&self.script),
        ))
    }
}

/// Render a default host page for `block_id` using `markup`.
pub fn render_host_page(block_id: Option<&str>, markup: &HostMarkup) -> Result<String, DomError> {
    let mut page = HostPage::new("Content Block").with_markup(markup.clone());
    if let Some(id) = block_id {
        page = page.with_block_id(id);
    }
    page.render()
}

/// Nest one element per compound of `selector` so the innermost matches it.
fn element(
    selector: &str,
    default_tag: &str,
    extra: &[(String, String)],
    content: &str,
) -> Result<String, DomError> {
    let selector = Selector::parse(selector)?;
    let compounds = selector.compounds();
    let last = compounds.len() - 1;

    let mut html = content.to_string();
    for (i, compound) in compounds.iter().enumerate().rev() {
        let (tag, attrs) = if i == last {
            open_tag(compound, default_tag, extra)
        } else {
            open_tag(compound, "div", &[])
        };
        html = format!("<{}{}>{}</{}>", tag, attrs, html, tag);
    }
    Ok(html)
}

fn open_tag(compound: &Compound, default_tag: &str, extra: &[(String, String)]) -> (String, String) {
    let tag = compound.tag.clone().unwrap_or_else(|| default_tag.to_string());
    let attrs: String = compound
        .required_attributes()
        .into_iter()
        .chain(extra.iter().cloned())
        .map(|(name, value)| {
            if value.is_empty() {
                format!(" {}", name)
            } else {
                format!(" {}=\"{}\"", name, html_escape(&value))
            }
        })
        .collect();
    (tag, attrs)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// JSON inside a script element must not close it.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use block_sdk::block_dom::{Dom, MemoryDom};

    use super::*;

    #[test]
    fn test_host_page_contains_contract_markup() {
        let html = render_host_page(Some("promo-block"), &HostMarkup::default()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<section data-content-block data-block-id="promo-block">"#));
        assert!(html.contains("<h2 data-block-title></h2>"));
        assert!(html.contains("<p data-block-description></p>"));
        assert!(html.contains(r#"<button data-block-button type="button"></button>"#));
        assert!(html.contains("[hidden] { display: none !important; }"));
        assert!(html.contains(r#"import init from "./pkg/content_block.js";"#));
    }

    #[test]
    fn test_host_page_without_block_id() {
        let html = render_host_page(None, &HostMarkup::default()).unwrap();
        assert!(html.contains("<section data-content-block>"));
        assert!(!html.contains("data-block-id="));
    }

    #[test]
    fn test_host_page_escapes_block_id() {
        let html = render_host_page(Some(r#""><script>alert(1)</script>"#), &HostMarkup::default())
            .unwrap();
        assert!(html.contains("data-block-id=\"&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;\""));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn test_host_page_nests_descendant_selectors() {
        let markup = HostMarkup {
            container: "main .promo".to_string(),
            title: "header h1".to_string(),
            ..HostMarkup::default()
        };
        let html = render_host_page(None, &markup).unwrap();

        assert!(html.contains(r#"<main><section class="promo">"#));
        assert!(html.contains("<header><h1></h1></header>"));
    }

    #[test]
    fn test_host_page_rejects_invalid_selector() {
        let markup = HostMarkup {
            button: "div > button".to_string(),
            ..HostMarkup::default()
        };
        assert!(matches!(
            render_host_page(None, &markup),
            Err(DomError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_embedded_config_is_script_safe() {
        let mut config = BlockConfig::default();
        config.defaults.title = "</script><b>".to_string();

        let html = HostPage::new("Test").with_config(config).render().unwrap();

        assert!(html.contains(r#"<script type="application/json" id="block-config">"#));
        assert!(html.contains(r#"<\/script><b>"#));
    }

    #[test]
    fn test_template_and_page_agree_on_contract() {
        // The same selectors that build the page must find its elements.
        let nested = HostMarkup {
            container: "main [data-content-block]".to_string(),
            title: "header h1".to_string(),
            button: "footer a.cta".to_string(),
            ..HostMarkup::default()
        };

        for markup in [HostMarkup::default(), nested] {
            let dom = MemoryDom::new();
            let nodes = block_sdk::block_dom::HostTemplate::complete(Some("x"))
                .build(&dom, &markup)
                .unwrap();
            let container = dom.query(&markup.container).unwrap();
            assert_eq!(container, nodes.container);
            let container = container.unwrap();

            let html = render_host_page(Some("x"), &markup).unwrap();
            for selector in [&markup.title, &markup.description, &markup.button] {
                assert!(dom.query_within(&container, selector).unwrap().is_some());
            }
            for selector in [&markup.container, &markup.title, &markup.description, &markup.button] {
                for compound in Selector::parse(selector).unwrap().compounds() {
                    if let Some(tag) = &compound.tag {
                        assert!(html.contains(&format!("<{}", tag)), "{} missing", tag);
                    }
                    for (name, _) in compound.required_attributes() {
                        assert!(html.contains(&name), "{} missing", name);
                    }
                }
            }
        }
    }
}
