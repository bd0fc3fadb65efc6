use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pf_core::{DocumentFormatter, Error, FormatRequest, FormattedDocument, Oracle, Result};
use pf_inference::extract::extract_payload;
use pf_inference::prompt;
use tracing::{info, warn};

use crate::deterministic::DeterministicFormatter;
use crate::keys::rekey_duplicates;
use crate::truncate_excerpt;

/// Asks the oracle for the Portable Text document. Falls back to the
/// deterministic formatter when the oracle cannot be reached, but reports
/// replies that do not hold a usable document.
#[derive(Debug, Clone)]
pub struct ModelAssistedFormatter {
    oracle: Arc<dyn Oracle>,
    local: DeterministicFormatter,
}

impl ModelAssistedFormatter {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            local: DeterministicFormatter::new(),
        }
    }

    fn parse_reply(&self, reply: &str) -> Result<FormattedDocument> {
        let payload = extract_payload(reply).ok_or_else(|| {
            Error::MalformedResponse("no JSON payload in formatting reply".to_string())
        })?;
        let mut document: FormattedDocument = serde_json::from_value(payload)
            .map_err(|e| Error::MalformedResponse(format!("reply is not a post document: {}", e)))?;

        if document.doc_type != "post" {
            warn!("⚠️ Formatted document has _type '{}', expected 'post'", document.doc_type);
        }
        // The model tends to echo the example date from the prompt.
        document.published_at = Utc::now();
        document.excerpt = truncate_excerpt(&document.excerpt);
        let rekeyed = rekey_duplicates(&mut document);
        if rekeyed > 0 {
            warn!("⚠️ Replaced {} duplicate block keys", rekeyed);
        }
        Ok(document)
    }
}

#[async_trait]
impl DocumentFormatter for ModelAssistedFormatter {
    fn name(&self) -> &str {
        "model-assisted"
    }

    async fn format(&self, request: &FormatRequest) -> Result<FormattedDocument> {
        if !self.oracle.check_availability().await {
            warn!("⚠️ {} is not available, formatting locally", self.oracle.name());
            return Ok(self.local.build(request));
        }

        info!("🧱 Formatting '{}' with {}", request.title, self.oracle.name());
        let reply = match self.oracle.send_prompt(&prompt::format_document(request)).await {
            Ok(reply) => reply,
            Err(e) if e.is_oracle_failure() => {
                warn!("⚠️ Formatting through {} failed ({}), formatting locally", self.oracle.name(), e);
                return Ok(self.local.build(request));
            }
            Err(e) => return Err(e),
        };
        self.parse_reply(&reply)
    }
}
