use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use pf_core::{Article, Content, Error, Oracle, Result, TranslationResult, TranslationStatus, Translator};
use serde_json::Value;
use tracing::{error, info, warn};

use super::{FallbackPolicy, Languages, TranslationMode};
use crate::extract::extract_object;
use crate::prompt;

/// Translates articles through the oracle, falling back to the configured
/// policy whenever the oracle cannot deliver.
pub struct OracleTranslator {
    oracle: Arc<dyn Oracle>,
    mode: TranslationMode,
    languages: Languages,
    fallback: FallbackPolicy,
}

impl OracleTranslator {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        mode: TranslationMode,
        languages: Languages,
        fallback: FallbackPolicy,
    ) -> Self {
        Self {
            oracle,
            mode,
            languages,
            fallback,
        }
    }

    async fn translate_text(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        let reply = self
            .oracle
            .send_prompt(&prompt::translate_text(text, &self.languages))
            .await?;
        if reply.is_empty() {
            return Err(Error::MalformedResponse("empty translation".to_string()));
        }
        Ok(reply)
    }

    async fn translate_fields(&self, article: &Article) -> Result<Article> {
        let mut translated = article.clone();

        info!("🌐 Translating title...");
        translated.title = self.translate_text(&article.title).await?;

        if let Some(summary) = &article.summary {
            info!("🌐 Translating summary...");
            translated.summary = Some(self.translate_text(summary).await?);
        }

        if let Some(excerpt) = &article.excerpt {
            translated.excerpt = if article.summary.as_ref() == Some(excerpt) {
                translated.summary.clone()
            } else {
                info!("🌐 Translating excerpt...");
                Some(self.translate_text(excerpt).await?)
            };
        }

        info!("🌐 Translating content...");
        translated.content = match &article.content {
            Content::Text(text) => Content::Text(self.translate_text(text).await?),
            Content::Paragraphs(paragraphs) => {
                let mut out = Vec::with_capacity(paragraphs.len());
                for paragraph in paragraphs {
                    out.push(self.translate_text(paragraph).await?);
                }
                Content::Paragraphs(out)
            }
        };

        Ok(translated)
    }

    async fn translate_whole(&self, article: &Article) -> Result<Article> {
        info!("🌐 Translating article in one pass...");
        let reply = self
            .oracle
            .send_prompt(&prompt::translate_article(article, &self.languages))
            .await?;
        let payload = extract_object(&reply).ok_or_else(|| {
            Error::MalformedResponse("no JSON object in translation reply".to_string())
        })?;

        let text = |key: &str| payload.get(key).and_then(Value::as_str).map(str::to_string);

        // Fields the payload leaves out keep their source value.
        let mut translated = article.clone();
        if let Some(title) = text("title") {
            translated.title = title;
        }
        if article.summary.is_some() {
            if let Some(summary) = text("summary") {
                translated.summary = Some(summary);
            }
        }
        if article.excerpt.is_some() {
            if let Some(excerpt) = text("excerpt") {
                translated.excerpt = Some(excerpt);
            } else if article.excerpt == article.summary {
                translated.excerpt = translated.summary.clone();
            }
        }
        if let Some(content) = payload
            .get("content")
            .and_then(|v| serde_json::from_value::<Content>(v.clone()).ok())
        {
            translated.content = content;
        }

        Ok(translated)
    }
}

impl fmt::Debug for OracleTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleTranslator")
            .field("oracle", &self.oracle)
            .field("mode", &self.mode)
            .field("languages", &self.languages)
            .finish()
    }
}

#[async_trait]
impl Translator for OracleTranslator {
    fn name(&self) -> &str {
        match self.mode {
            TranslationMode::WholeArticle => "whole-article",
            _ => "field-by-field",
        }
    }

    async fn translate(&self, article: &Article) -> TranslationResult {
        if !self.oracle.check_availability().await {
            warn!(
                "⚠️ {} is not available, applying fallback translation",
                self.oracle.name()
            );
            return self.fallback.apply(article);
        }

        let attempt = match self.mode {
            TranslationMode::WholeArticle => self.translate_whole(article).await,
            _ => self.translate_fields(article).await,
        };

        match attempt {
            Ok(translated) => TranslationResult::new(translated, TranslationStatus::Translated),
            Err(e) => {
                error!("❌ Translation of '{}' failed: {}", article.title, e);
                self.fallback.apply(article)
            }
        }
    }
}
