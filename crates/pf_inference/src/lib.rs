use std::sync::Arc;

use pf_core::{Oracle, Translator};

pub mod extract;
pub mod oracle;
pub mod prompt;
pub mod summarize;
pub mod translate;

pub use oracle::{create_oracle, CliOracle, OracleConfig, ScriptedOracle};
pub use summarize::Summarizer;
pub use translate::{create_translator, FallbackPolicy, Languages, TranslationMode, TranslatorConfig};

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub oracle: OracleConfig,
    pub translator: TranslatorConfig,
    /// Never spawn the oracle; every stage takes its offline path.
    pub offline: bool,
}

/// Build the oracle and the translator that sits on top of it.
pub fn create_inference(config: &Config) -> (Arc<dyn Oracle>, Arc<dyn Translator>) {
    let oracle = create_oracle(&config.oracle, config.offline);
    let translator = create_translator(config.translator.clone(), oracle.clone());
    (oracle, translator)
}

pub mod prelude {
    pub use super::{create_inference, Config};
    pub use super::extract::{extract_object, extract_payload};
    pub use super::oracle::{create_oracle, CliOracle, OracleConfig, ScriptedOracle};
    pub use super::translate::{create_translator, FallbackPolicy, TranslationMode, TranslatorConfig};
    pub use pf_core::{Article, Error, Oracle, Result, TranslationResult, Translator};
}
