//! Static catalog standing in for a CMS endpoint.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use block_core::{BlockId, ContentPayload, DEFAULT_BLOCK_ID};

use crate::delay::{platform_delay, Delay};
use crate::source::{ContentSource, FetchError};

/// Latency the mock source waits before resolving.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// In-memory content source.
///
/// Looks identifiers up in a fixed mapping after an artificial delay.
/// Unknown identifiers resolve to `ContentPayload::not_found`.
#[derive(Clone)]
pub struct MockContentSource {
    entries: BTreeMap<BlockId, ContentPayload>,
    latency: Duration,
    delay: Rc<dyn Delay>,
}

impl MockContentSource {
    /// Create an empty source using the platform timer.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            latency: DEFAULT_LATENCY,
            delay: platform_delay(),
        }
    }

    /// Create a source with the built-in catalog.
    pub fn with_default_catalog() -> Self {
        default_catalog()
            .into_iter()
            .fold(Self::new(), |source, (id, payload)| {
                source.with_entry(id, payload)
            })
    }

    /// Build a source from a JSON object keyed by block id.
    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        let entries: BTreeMap<BlockId, ContentPayload> = serde_json::from_str(json)
            .map_err(|e| FetchError::Deserialization(e.to_string()))?;

        Ok(Self {
            entries,
            ..Self::new()
        })
    }

    /// Add or replace an entry.
    pub fn with_entry(mut self, id: impl Into<BlockId>, payload: ContentPayload) -> Self {
        self.entries.insert(id.into(), payload);
        self
    }

    /// Set the artificial latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Set the timer used to wait out the latency.
    pub fn with_delay(mut self, delay: Rc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    /// The artificial latency.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Known identifiers, in order.
    pub fn ids(&self) -> impl Iterator<Item = &BlockId> {
        self.entries.keys()
    }

    /// Entry for `id` without waiting.
    pub fn get(&self, id: &BlockId) -> Option<&ContentPayload> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MockContentSource {
    fn default() -> Self {
        Self::with_default_catalog()
    }
}

#[async_trait(?Send)]
impl ContentSource for MockContentSource {
    async fn fetch_content(&self, id: &BlockId) -> Result<ContentPayload, FetchError> {
        self.delay.sleep(self.latency).await;

        Ok(self
            .entries
            .get(id)
            .cloned()
            .unwrap_or_else(|| ContentPayload::not_found(id)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Entries shipped with the mock source.
pub fn default_catalog() -> Vec<(BlockId, ContentPayload)> {
    vec![
        (
            BlockId::new(DEFAULT_BLOCK_ID),
            ContentPayload::new(
                "Welcome to Our Platform",
                "Discover tools that help your team plan, build and ship faster.",
            )
            .with_button("Learn More")
            .with_link("/features"),
        ),
        (
            BlockId::new("promo-block"),
            ContentPayload::new(
                "Limited Time Offer",
                "Save 20% on annual plans when you upgrade this month.",
            )
            .with_button("Claim Offer")
            .with_link("/pricing?promo=annual20"),
        ),
        (
            BlockId::new("info-block"),
            ContentPayload::new(
                "Did You Know?",
                "Every block on this page is rendered from structured content.",
            ),
        ),
        (
            BlockId::new("newsletter-block"),
            ContentPayload::new(
                "Stay in the Loop",
                "Get product updates and tips delivered to your inbox.",
            )
            .with_button("Subscribe"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;
    use crate::delay::{NoDelay, TokioDelay};

    // === Lookup ===

    #[tokio::test(start_paused = true)]
    async fn test_fetch_known_ids_resolve_to_entry() {
        let source = MockContentSource::with_default_catalog();

        for (id, expected) in default_catalog() {
            let payload = source.fetch_content(&id).await.unwrap();
            assert_eq!(payload, expected, "entry for {}", id);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_unknown_id_resolves_to_fallback() {
        let source = MockContentSource::with_default_catalog();
        let id = BlockId::new("missing-block-42");

        let payload = source.fetch_content(&id).await.unwrap();

        assert!(payload.title.contains("missing-block-42"));
        assert!(payload.description.contains("could not be found"));
        assert!(payload.button_text.is_none());
    }

    // === Latency ===

    #[tokio::test(start_paused = true)]
    async fn test_fetch_resolves_after_latency_and_not_before() {
        let source = MockContentSource::with_default_catalog().with_delay(Rc::new(TokioDelay));
        let id = BlockId::new("promo-block");

        let early =
            tokio::time::timeout(DEFAULT_LATENCY - Duration::from_millis(1), source.fetch_content(&id))
                .await;
        assert!(early.is_err(), "resolved before the latency elapsed");

        let start = Instant::now();
        let payload = source.fetch_content(&id).await.unwrap();
        assert!(start.elapsed() >= DEFAULT_LATENCY);
        assert_eq!(payload.title, "Limited Time Offer");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_custom_latency() {
        let source = MockContentSource::with_default_catalog()
            .with_delay(Rc::new(TokioDelay))
            .with_latency(Duration::from_millis(50));

        let start = Instant::now();
        source.fetch_content(&BlockId::default()).await.unwrap();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < DEFAULT_LATENCY);
    }

    #[tokio::test]
    async fn test_fetch_without_delay() {
        let source = MockContentSource::new()
            .with_delay(Rc::new(NoDelay))
            .with_entry("only", ContentPayload::new("Only", "Entry"));

        let payload = source.fetch_content(&BlockId::new("only")).await.unwrap();
        assert_eq!(payload.title, "Only");
    }

    // === Catalog ===

    #[test]
    fn test_default_catalog_ids() {
        let source = MockContentSource::default();
        let ids: Vec<&str> = source.ids().map(|id| id.as_str()).collect();

        assert_eq!(
            ids,
            vec!["default-block", "info-block", "newsletter-block", "promo-block"]
        );
        assert!(source.get(&BlockId::default()).unwrap().has_button());
        assert!(!source.get(&BlockId::new("info-block")).unwrap().has_button());
    }

    #[test]
    fn test_from_json_catalog() {
        let source = MockContentSource::from_json(
            r#"{
                "hero": {"title": "Hero", "description": "Big", "buttonText": "Go", "buttonLink": "/go"},
                "plain": {"title": "Plain", "description": "Small"}
            }"#,
        )
        .unwrap();

        assert_eq!(source.len(), 2);
        let hero = source.get(&BlockId::new("hero")).unwrap();
        assert_eq!(hero.button_link(), Some("/go"));
        assert_eq!(source.latency(), DEFAULT_LATENCY);
    }

    #[test]
    fn test_from_json_rejects_malformed_catalog() {
        let err = MockContentSource::from_json("[1, 2, 3]").err().unwrap();
        assert!(matches!(err, FetchError::Deserialization(_)));
    }
}
