use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use pf_core::{Article, ArticleStore, Error, Oracle, Result, RunReport, Stage, Translator};
use pf_format::{create_formatter, FormatterStrategy};
use pf_inference::summarize::DEFAULT_MAX_WORDS;
use pf_inference::{
    create_inference, Config, FallbackPolicy, OracleConfig, Summarizer, TranslationMode,
    TranslatorConfig,
};
use pf_storage::{FsStore, StoreConfig};

use crate::logging::Logger;
use crate::manager::{translated_name, PipelineConfig, PipelineManager};

#[derive(Args, Debug, Clone)]
pub struct OracleArgs {
    /// Oracle command-line program
    #[arg(long, global = true, default_value = "claude")]
    pub oracle: String,
    /// Seconds to wait for one oracle reply
    #[arg(long, global = true, default_value_t = 60)]
    pub timeout: u64,
    /// Extra attempts after a failed oracle call
    #[arg(long, global = true, default_value_t = 2)]
    pub retries: u32,
    /// Seconds between attempts
    #[arg(long, global = true, default_value_t = 3)]
    pub retry_delay: u64,
    /// Never call the oracle; every stage takes its offline path
    #[arg(long, global = true)]
    pub offline: bool,
}

impl OracleArgs {
    pub fn oracle_config(&self) -> OracleConfig {
        OracleConfig {
            timeout: Duration::from_secs(self.timeout),
            retries: self.retries,
            retry_delay: Duration::from_secs(self.retry_delay),
            ..OracleConfig::default()
        }
        .with_program(self.oracle.clone())
    }
}

#[derive(Args, Debug, Clone)]
pub struct TranslationArgs {
    /// Translation strategy: field, whole or disabled
    #[arg(long, default_value = "field")]
    pub mode: TranslationMode,
    /// Text prepended to fields that could not be translated
    #[arg(long, conflicts_with = "fallback_fixture")]
    pub fallback_marker: Option<String>,
    /// JSON object with canned field values used when translation fails
    #[arg(long)]
    pub fallback_fixture: Option<PathBuf>,
}

impl TranslationArgs {
    pub async fn translator_config(&self) -> Result<TranslatorConfig> {
        let fallback = match (&self.fallback_marker, &self.fallback_fixture) {
            (_, Some(path)) => FallbackPolicy::from_fixture_file(path).await?,
            (Some(marker), None) => FallbackPolicy::Marker(marker.clone()),
            (None, None) => FallbackPolicy::default(),
        };
        Ok(TranslatorConfig {
            mode: self.mode,
            fallback,
            ..TranslatorConfig::default()
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory holding the articles to translate
    #[arg(long, default_value = "posts_to_translate")]
    pub input: PathBuf,
    #[arg(long, default_value = "posts_translated")]
    pub translated: PathBuf,
    #[arg(long, default_value = "posts_formatted")]
    pub formatted: PathBuf,
    #[arg(long, default_value = "reports")]
    pub reports: PathBuf,
    /// Process at most this many files
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    /// Translate only, skip formatting
    #[arg(long)]
    pub no_format: bool,
    /// Reprocess files whose outputs already exist
    #[arg(long)]
    pub force: bool,
    /// Formatting strategy: model or deterministic
    #[arg(long, default_value = "deterministic")]
    pub formatter: FormatterStrategy,
    /// Prefix for formatted file names
    #[arg(long, default_value = "sanity")]
    pub prefix: String,
    #[command(flatten)]
    pub translation: TranslationArgs,
}

impl RunArgs {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            input: self.input.clone(),
            translated: self.translated.clone(),
            formatted: self.formatted.clone(),
            reports: self.reports.clone(),
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            prefix: self.prefix.clone(),
            limit: self.limit,
            force: self.force,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum PipelineCommands {
    /// Translate and format every article in the input directory
    Run(RunArgs),
    /// Translate a single article file into the translated directory
    Translate {
        file: PathBuf,
        #[arg(long, default_value = "posts_translated")]
        translated: PathBuf,
        /// Overwrite an existing translation
        #[arg(long)]
        force: bool,
        #[command(flatten)]
        translation: TranslationArgs,
    },
    /// Report whether the oracle can be reached
    Check,
    /// Summarize the text of a file
    Summarize {
        file: PathBuf,
        #[arg(long, default_value_t = DEFAULT_MAX_WORDS)]
        max_words: usize,
    },
}

/// What a command produced, for the binary to turn into an exit code.
#[derive(Debug)]
pub enum Outcome {
    Run(RunReport),
    Translated(PathBuf),
    Available(bool),
    Summary(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Run(report) => !report.has_failures(),
            Outcome::Available(available) => *available,
            Outcome::Translated(_) | Outcome::Summary(_) => true,
        }
    }
}

pub async fn handle_command(command: PipelineCommands, oracle_args: &OracleArgs) -> Result<Outcome> {
    let logger = Logger::new();
    match command {
        PipelineCommands::Run(args) => {
            let config = Config {
                oracle: oracle_args.oracle_config(),
                translator: args.translation.translator_config().await?,
                offline: oracle_args.offline,
            };
            let (oracle, translator) = create_inference(&config);
            logger.info(&format!(
                "🧠 Oracle initialized (using {}), translating {}",
                oracle.name(),
                translator.name()
            ));

            let formatter = if args.no_format {
                None
            } else {
                create_formatter(args.formatter, oracle)
            };
            let store = Arc::new(FsStore::new(args.store_config()));
            let manager = PipelineManager::new(store, translator, formatter, args.pipeline_config());
            Ok(Outcome::Run(manager.run().await?))
        }
        PipelineCommands::Translate {
            file,
            translated,
            force,
            translation,
        } => {
            let config = Config {
                oracle: oracle_args.oracle_config(),
                translator: translation.translator_config().await?,
                offline: oracle_args.offline,
            };
            let (_, translator) = create_inference(&config);
            let store = Arc::new(FsStore::new(StoreConfig {
                translated,
                ..StoreConfig::default()
            }));
            let path = translate_file(store, translator, &file, force, &logger).await?;
            Ok(Outcome::Translated(path))
        }
        PipelineCommands::Check => {
            let oracle = pf_inference::create_oracle(&oracle_args.oracle_config(), oracle_args.offline);
            let available = oracle.check_availability().await;
            if available {
                logger.info(&format!("✅ {} is available", oracle.name()));
            } else {
                logger.error(&format!("❌ {} is not available", oracle.name()));
            }
            Ok(Outcome::Available(available))
        }
        PipelineCommands::Summarize { file, max_words } => {
            let oracle = pf_inference::create_oracle(&oracle_args.oracle_config(), oracle_args.offline);
            let text = tokio::fs::read_to_string(&file).await?;
            let summary = Summarizer::new(oracle).summarize(&text, max_words).await?;
            Ok(Outcome::Summary(summary))
        }
    }
}

async fn translate_file(
    store: Arc<FsStore>,
    translator: Arc<dyn Translator>,
    file: &Path,
    force: bool,
    logger: &Logger,
) -> Result<PathBuf> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidInput(format!("not a file: {}", file.display())))?;
    let translated = translated_name(name);
    let target = store.locate(Stage::Translated, &translated);

    if !force && tokio::fs::try_exists(&target).await? {
        logger.info(&format!("⏭️ Translation already exists: {}", target.display()));
        return Ok(target);
    }

    let raw = tokio::fs::read_to_string(file).await?;
    let article = Article::from_value(serde_json::from_str(&raw)?)?;
    logger.info(&format!("📰 Loaded {}", name));

    let manager = PipelineManager::new(store, translator, None, PipelineConfig::default());
    manager.translate_article(&article, &translated, logger).await?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        oracle: OracleArgs,
        #[command(subcommand)]
        command: PipelineCommands,
    }

    #[test]
    fn test_run_defaults() {
        let cli = TestCli::parse_from(["pf", "run"]);
        let PipelineCommands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.prefix, "sanity");
        assert_eq!(args.formatter, FormatterStrategy::Deterministic);
        assert_eq!(args.translation.mode, TranslationMode::FieldByField);
        assert_eq!(args.store_config(), StoreConfig::default());
        assert_eq!(cli.oracle.oracle_config().program, "claude");
        assert_eq!(cli.oracle.oracle_config().timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_run_flags() {
        let cli = TestCli::parse_from([
            "pf", "run", "--limit", "2", "--no-format", "--force", "--mode", "whole",
            "--formatter", "model", "--prefix", "cms", "--timeout", "5", "--offline",
        ]);
        let PipelineCommands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.limit, Some(2));
        assert!(args.no_format && args.force);
        assert_eq!(args.translation.mode, TranslationMode::WholeArticle);
        assert_eq!(args.formatter, FormatterStrategy::ModelAssisted);
        assert_eq!(args.pipeline_config().prefix, "cms");
        assert!(cli.oracle.offline);
        assert_eq!(cli.oracle.oracle_config().timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_marker_and_fixture_conflict() {
        let result = TestCli::try_parse_from([
            "pf", "run", "--fallback-marker", "[X]", "--fallback-fixture", "f.json",
        ]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_offline_check() {
        let cli = TestCli::parse_from(["pf", "check", "--offline"]);
        let outcome = handle_command(cli.command, &cli.oracle).await.unwrap();
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_translate_single_file_offline() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("hello.json");
        std::fs::write(
            &input,
            r#"{"title": "Hello World", "excerpt": "A short greeting.", "content": "<p>Hello there.</p>"}"#,
        )
        .unwrap();
        let out = dir.path().join("out");

        let cli = TestCli::parse_from([
            "pf",
            "translate",
            input.to_str().unwrap(),
            "--translated",
            out.to_str().unwrap(),
            "--offline",
        ]);
        let Outcome::Translated(path) = handle_command(cli.command, &cli.oracle).await.unwrap() else {
            panic!("expected a translation");
        };
        assert_eq!(path, out.join("translated_hello.json"));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["title"], "[TRANSLATION FAILED] Hello World");
        assert_eq!(written["translation_status"], "fallback");
    }
}
