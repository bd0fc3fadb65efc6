use std::str::FromStr;
use std::sync::Arc;

use pf_core::{DocumentFormatter, Oracle, EXCERPT_MAX_CHARS};

pub mod deterministic;
pub mod keys;
pub mod model_assisted;
pub mod segment;
pub mod slug;

pub use deterministic::DeterministicFormatter;
pub use model_assisted::ModelAssistedFormatter;
pub use segment::split_paragraphs;
pub use slug::slugify;

/// How formatted documents are produced, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatterStrategy {
    ModelAssisted,
    #[default]
    Deterministic,
    /// Skip the formatting stage.
    Disabled,
}

impl FromStr for FormatterStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "model" | "model-assisted" => Ok(Self::ModelAssisted),
            "deterministic" | "local" => Ok(Self::Deterministic),
            "disabled" | "off" => Ok(Self::Disabled),
            other => Err(format!(
                "Invalid formatter: {} (expected model, deterministic or disabled)",
                other
            )),
        }
    }
}

/// `None` when formatting is disabled.
pub fn create_formatter(
    strategy: FormatterStrategy,
    oracle: Arc<dyn Oracle>,
) -> Option<Arc<dyn DocumentFormatter>> {
    match strategy {
        FormatterStrategy::ModelAssisted => Some(Arc::new(ModelAssistedFormatter::new(oracle))),
        FormatterStrategy::Deterministic => Some(Arc::new(DeterministicFormatter::new())),
        FormatterStrategy::Disabled => None,
    }
}

/// Hard cut at `EXCERPT_MAX_CHARS` characters, no ellipsis.
pub fn truncate_excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_MAX_CHARS).collect()
}
