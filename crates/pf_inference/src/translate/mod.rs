use std::str::FromStr;
use std::sync::Arc;

use pf_core::{Oracle, Translator};

pub mod fallback;
pub mod oracle;

pub use fallback::{FallbackPolicy, FallbackTranslator};
pub use oracle::OracleTranslator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationMode {
    /// One oracle call per field; the raw reply is the translation.
    #[default]
    FieldByField,
    /// One oracle call for the whole article, answered with a JSON object.
    WholeArticle,
    /// No oracle call; the fallback policy is applied directly.
    Disabled,
}

impl FromStr for TranslationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "field" | "field-by-field" => Ok(Self::FieldByField),
            "whole" | "whole-article" => Ok(Self::WholeArticle),
            "disabled" | "off" => Ok(Self::Disabled),
            other => Err(format!(
                "Invalid translation mode: {} (expected field, whole or disabled)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Languages {
    pub source: String,
    pub target: String,
}

impl Default for Languages {
    fn default() -> Self {
        Self {
            source: "English".to_string(),
            target: "Brazilian Portuguese".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TranslatorConfig {
    pub mode: TranslationMode,
    pub languages: Languages,
    pub fallback: FallbackPolicy,
}

pub fn create_translator(config: TranslatorConfig, oracle: Arc<dyn Oracle>) -> Arc<dyn Translator> {
    match config.mode {
        TranslationMode::Disabled => Arc::new(FallbackTranslator::new(config.fallback)),
        TranslationMode::FieldByField | TranslationMode::WholeArticle => Arc::new(
            OracleTranslator::new(oracle, config.mode, config.languages, config.fallback),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ScriptedOracle;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("field".parse::<TranslationMode>(), Ok(TranslationMode::FieldByField));
        assert_eq!("Whole".parse::<TranslationMode>(), Ok(TranslationMode::WholeArticle));
        assert_eq!("off".parse::<TranslationMode>(), Ok(TranslationMode::Disabled));
        assert!("sideways".parse::<TranslationMode>().is_err());
    }

    #[test]
    fn test_create_translator_by_mode() {
        let oracle: Arc<dyn Oracle> = Arc::new(ScriptedOracle::new());
        let disabled = create_translator(
            TranslatorConfig {
                mode: TranslationMode::Disabled,
                ..TranslatorConfig::default()
            },
            oracle.clone(),
        );
        assert_eq!(disabled.name(), "fallback");

        let whole = create_translator(
            TranslatorConfig {
                mode: TranslationMode::WholeArticle,
                ..TranslatorConfig::default()
            },
            oracle,
        );
        assert_eq!(whole.name(), "whole-article");
    }
}
