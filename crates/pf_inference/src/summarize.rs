use std::sync::Arc;

use pf_core::{Error, Oracle, Result};
use tracing::info;

use crate::prompt;

pub const DEFAULT_MAX_WORDS: usize = 100;

/// Asks the oracle for short summaries. Unlike translation there is no
/// fallback: failures are returned to the caller.
#[derive(Debug, Clone)]
pub struct Summarizer {
    oracle: Arc<dyn Oracle>,
}

impl Summarizer {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn summarize(&self, text: &str, max_words: usize) -> Result<String> {
        if max_words == 0 {
            return Err(Error::InvalidInput("max_words must be at least 1".to_string()));
        }
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("nothing to summarize".to_string()));
        }
        if !self.oracle.check_availability().await {
            return Err(Error::Unavailable(self.oracle.name().to_string()));
        }

        info!("📝 Summarizing {} words into at most {}", text.split_whitespace().count(), max_words);
        let reply = self.oracle.send_prompt(&prompt::summarize(text, max_words)).await?;
        if reply.is_empty() {
            return Err(Error::MalformedResponse("empty summary".to_string()));
        }
        Ok(reply)
    }
}
