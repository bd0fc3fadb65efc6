use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Fields an input article must carry before it can be processed.
pub const REQUIRED_FIELDS: &[&str] = &["title", "content", "excerpt"];

/// Fields the translator rewrites. Everything else is passed through.
pub const TRANSLATABLE_FIELDS: &[&str] = &["title", "summary", "excerpt", "content"];

/// Hard limit on the length of a formatted excerpt, in characters.
pub const EXCERPT_MAX_CHARS: usize = 299;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Paragraphs(Vec<String>),
}

impl Content {
    /// Content as a single text, paragraphs separated by blank lines.
    pub fn to_text(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Paragraphs(paragraphs) => paragraphs.join("\n\n"),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(text) => text.trim().is_empty(),
            Content::Paragraphs(paragraphs) => paragraphs.iter().all(|p| p.trim().is_empty()),
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Passthrough fields (tags, author, ...) kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    /// Build an article from a raw JSON record, reporting the first required
    /// field that is absent or null as `Error::MissingField`.
    pub fn from_value(value: Value) -> Result<Self> {
        let record = value
            .as_object()
            .ok_or_else(|| Error::InvalidInput("article must be a JSON object".to_string()))?;

        if let Some(field) = missing_required_field(record) {
            return Err(Error::MissingField(field.to_string()));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// The text used as the short description: the excerpt, else the summary.
    pub fn blurb(&self) -> Option<&str> {
        self.excerpt.as_deref().or(self.summary.as_deref())
    }
}

/// First entry of `REQUIRED_FIELDS` that the record lacks.
pub fn missing_required_field(record: &Map<String, Value>) -> Option<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .find(|field| matches!(record.get(*field), None | Some(Value::Null)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    Translated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    #[serde(flatten)]
    pub article: Article,
    pub translated_date: DateTime<Utc>,
    pub translation_status: TranslationStatus,
}

impl TranslationResult {
    pub fn new(mut article: Article, status: TranslationStatus) -> Self {
        // Stale stamps from a re-fed output would otherwise serialize twice.
        article.extra.remove("translated_date");
        article.extra.remove("translation_status");
        Self {
            article,
            translated_date: Utc::now(),
            translation_status: status,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.translation_status == TranslationStatus::Fallback
    }
}

/// Everything the document formatter needs from an article.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRequest {
    pub title: String,
    pub body: Content,
    pub summary: Option<String>,
    pub source: Option<String>,
    pub link: Option<String>,
    /// Title before translation, recorded under `originalSource.title`.
    pub original_title: Option<String>,
}

impl FormatRequest {
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            body: article.content.clone(),
            summary: article.blurb().map(str::to_string),
            source: article.source.clone(),
            link: article.link.clone(),
            original_title: None,
        }
    }

    pub fn with_original_title(mut self, title: impl Into<String>) -> Self {
        self.original_title = Some(title.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedDocument {
    #[serde(rename = "_type")]
    pub doc_type: String,
    pub title: String,
    pub slug: Slug,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub excerpt: String,
    pub content: Vec<Block>,
    pub original_source: OriginalSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(rename = "_type")]
    pub slug_type: String,
    pub current: String,
}

impl Slug {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            slug_type: "slug".to_string(),
            current: current.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "_type")]
    pub block_type: String,
    #[serde(rename = "_key")]
    pub key: String,
    pub style: String,
    #[serde(default)]
    pub mark_defs: Vec<Value>,
    pub children: Vec<Span>,
}

impl Block {
    /// A plain paragraph holding a single unmarked span.
    pub fn paragraph(key: String, span_key: String, text: impl Into<String>) -> Self {
        Self {
            block_type: "block".to_string(),
            key,
            style: "normal".to_string(),
            mark_defs: Vec::new(),
            children: vec![Span {
                span_type: "span".to_string(),
                key: span_key,
                text: text.into(),
                marks: Vec::new(),
            }],
        }
    }

    pub fn text(&self) -> String {
        self.children.iter().map(|span| span.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "_type")]
    pub span_type: String,
    #[serde(rename = "_key")]
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginalSource {
    pub url: String,
    pub title: String,
    pub site: String,
}
