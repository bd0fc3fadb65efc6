use async_trait::async_trait;
use std::fmt;

use crate::types::{Article, FormatRequest, FormattedDocument, TranslationResult};
use crate::Result;

/// An external text-in/text-out language model.
#[async_trait]
pub trait Oracle: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Probe whether the oracle can answer prompts. Never fails.
    async fn check_availability(&self) -> bool;

    /// Send a prompt and return the reply, trimmed.
    async fn send_prompt(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait Translator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Translate an article. Always yields a complete result; failures are
    /// folded into a fallback result rather than returned.
    async fn translate(&self, article: &Article) -> TranslationResult;
}

#[async_trait]
pub trait DocumentFormatter: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Convert an article into a Portable Text post document.
    async fn format(&self, request: &FormatRequest) -> Result<FormattedDocument>;
}
