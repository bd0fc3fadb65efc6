use std::path::Path;

use async_trait::async_trait;
use pf_core::{Article, Content, Error, Result, TranslationResult, TranslationStatus, Translator};
use serde_json::{Map, Value};

/// What to put in place of a translation that could not be obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackPolicy {
    /// Prefix every translatable field with a visible marker.
    Marker(String),
    /// Canned values by field name, for demos and fixtures. Fields without a
    /// canned value get the default marker.
    Fixture(Map<String, Value>),
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        FallbackPolicy::Marker(Self::DEFAULT_MARKER.to_string())
    }
}

impl FallbackPolicy {
    pub const DEFAULT_MARKER: &'static str = "[TRANSLATION FAILED]";

    pub async fn from_fixture_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(values) => Ok(FallbackPolicy::Fixture(values)),
            _ => Err(Error::InvalidInput(format!(
                "fallback fixture {} must hold a JSON object",
                path.display()
            ))),
        }
    }

    /// Build the fallback result for an article. Keeps every source key.
    pub fn apply(&self, article: &Article) -> TranslationResult {
        let mut result = article.clone();
        result.title = self.text_for("title", &article.title);
        result.summary = article.summary.as_deref().map(|s| self.text_for("summary", s));
        result.excerpt = article.excerpt.as_deref().map(|e| self.text_for("excerpt", e));
        result.content = self.content_for(&article.content);
        TranslationResult::new(result, TranslationStatus::Fallback)
    }

    fn marker(&self) -> &str {
        match self {
            FallbackPolicy::Marker(marker) => marker,
            FallbackPolicy::Fixture(_) => Self::DEFAULT_MARKER,
        }
    }

    fn canned(&self, field: &str) -> Option<&Value> {
        match self {
            FallbackPolicy::Fixture(values) => values.get(field),
            FallbackPolicy::Marker(_) => None,
        }
    }

    fn text_for(&self, field: &str, original: &str) -> String {
        self.canned(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| mark(self.marker(), original))
    }

    fn content_for(&self, content: &Content) -> Content {
        if let Some(canned) = self
            .canned("content")
            .and_then(|v| serde_json::from_value::<Content>(v.clone()).ok())
        {
            return canned;
        }
        match content {
            Content::Text(text) => Content::Text(mark(self.marker(), text)),
            Content::Paragraphs(paragraphs) => Content::Paragraphs(
                paragraphs.iter().map(|p| mark(self.marker(), p)).collect(),
            ),
        }
    }
}

fn mark(marker: &str, text: &str) -> String {
    if text.is_empty() {
        marker.to_string()
    } else {
        format!("{} {}", marker, text)
    }
}

/// Translator used when translation is switched off.
#[derive(Debug, Clone, Default)]
pub struct FallbackTranslator {
    policy: FallbackPolicy,
}

impl FallbackTranslator {
    pub fn new(policy: FallbackPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl Translator for FallbackTranslator {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn translate(&self, article: &Article) -> TranslationResult {
        self.policy.apply(article)
    }
}
