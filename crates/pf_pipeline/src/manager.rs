use std::sync::Arc;

use pf_core::{
    Article, ArticleStore, DocumentFormatter, Error, FileSuccess, FormatRequest, Result, RunReport,
    Stage, TranslationResult, Translator,
};
use serde_json::Value;

use crate::logging::Logger;
use crate::repair::repair_record;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Prefix for formatted file names.
    pub prefix: String,
    /// Process at most this many files; `None` or zero means all.
    pub limit: Option<usize>,
    /// Reprocess files whose outputs already exist.
    pub force: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prefix: "sanity".to_string(),
            limit: None,
            force: false,
        }
    }
}

pub fn translated_name(name: &str) -> String {
    format!("translated_{}", name)
}

pub fn formatted_name(prefix: &str, translated: &str) -> String {
    let stem = translated.strip_suffix(".json").unwrap_or(translated);
    format!("{}_{}.json", prefix, stem)
}

/// Runs every input file through translation and, unless disabled,
/// formatting. One file at a time, in name order.
pub struct PipelineManager {
    store: Arc<dyn ArticleStore>,
    translator: Arc<dyn Translator>,
    formatter: Option<Arc<dyn DocumentFormatter>>,
    config: PipelineConfig,
}

impl PipelineManager {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        translator: Arc<dyn Translator>,
        formatter: Option<Arc<dyn DocumentFormatter>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            translator,
            formatter,
            config,
        }
    }

    /// Process the input collection and persist a report.
    ///
    /// A missing input directory still produces an empty report, then
    /// returns `Error::MissingInputDir`.
    pub async fn run(&self) -> Result<RunReport> {
        let logger = Logger::new();
        logger.info("🚀 Starting article processing...");

        if let Err(e) = self.store.check_input().await {
            logger.error(&format!("❌ {}", e));
            self.save_report(&RunReport::new(0), &logger).await?;
            return Err(e);
        }

        let mut files = self.store.list(Stage::Input).await?;
        if files.is_empty() {
            logger.warn("No input files found");
        } else {
            logger.info(&format!("📁 {} files found", files.len()));
        }
        if let Some(limit) = self.config.limit.filter(|l| *l > 0) {
            if files.len() > limit {
                files.truncate(limit);
                logger.info(&format!("⚡ Limited to {} files", limit));
            }
        }

        let total = files.len();
        let mut report = RunReport::new(total);
        for (i, name) in files.iter().enumerate() {
            let file_logger = logger
                .clone()
                .with_prefix(format!("[{}/{}]", i + 1, total))
                .with_prefix(name.clone());
            match self.process_file(name, &file_logger).await {
                Ok(success) => report.record_success(success),
                Err(e) => {
                    file_logger.error(&format!("❌ {}", e));
                    report.record_failure(self.location(Stage::Input, name), e);
                }
            }
        }

        logger.info("📊 Processing summary:");
        logger.info(&format!("✅ Succeeded: {} files", report.success_count));
        logger.info(&format!("❌ Failed: {} files", report.error_count));
        for failure in &report.errors {
            logger.info(&format!("  - {}: {}", failure.original, failure.error));
        }

        self.save_report(&report, &logger).await?;
        logger.info("✨ Processing complete!");
        Ok(report)
    }

    async fn process_file(&self, name: &str, logger: &Logger) -> Result<FileSuccess> {
        let translated = translated_name(name);
        let formatted = self
            .formatter
            .as_ref()
            .map(|_| formatted_name(&self.config.prefix, &translated));

        if !self.config.force && self.outputs_exist(&translated, formatted.as_deref()).await? {
            logger.info("⏭️ Outputs already exist, skipping");
            return Ok(FileSuccess {
                original: self.location(Stage::Input, name),
                translated: self.location(Stage::Translated, &translated),
                formatted: formatted.map(|f| self.location(Stage::Formatted, &f)),
                skipped: true,
                repaired: false,
            });
        }

        let (article, repaired) = self.load_article(name, logger).await?;
        let result = self.translate_article(&article, &translated, logger).await?;

        let formatted = match (&self.formatter, formatted) {
            (Some(formatter), Some(formatted)) => {
                let request = FormatRequest::from_article(&result.article)
                    .with_original_title(article.title.clone());
                logger.info(&format!("🧱 Formatting with {}", formatter.name()));
                let document = formatter.format(&request).await?;
                self.store
                    .write(Stage::Formatted, &formatted, &serde_json::to_value(&document)?)
                    .await?;
                let location = self.location(Stage::Formatted, &formatted);
                logger.info(&format!("✅ Formatted: {}", location));
                Some(location)
            }
            _ => None,
        };

        Ok(FileSuccess {
            original: self.location(Stage::Input, name),
            translated: self.location(Stage::Translated, &translated),
            formatted,
            skipped: false,
            repaired,
        })
    }

    /// Translate one article into `translated` and persist the result.
    pub async fn translate_article(
        &self,
        article: &Article,
        translated: &str,
        logger: &Logger,
    ) -> Result<TranslationResult> {
        logger.info(&format!("🌐 Translating with {}", self.translator.name()));
        let result = self.translator.translate(article).await;
        if result.is_fallback() {
            logger.warn("⚠️ Translation unavailable, wrote fallback text");
        }
        self.store
            .write(Stage::Translated, translated, &serde_json::to_value(&result)?)
            .await?;
        logger.info(&format!("✅ Translated: {}", self.location(Stage::Translated, translated)));
        Ok(result)
    }

    /// Parse an input record, repairing it at most once. A repaired record
    /// that parses replaces the input file.
    async fn load_article(&self, name: &str, logger: &Logger) -> Result<(Article, bool)> {
        let record = self.store.read(Stage::Input, name).await?;
        let field = match Article::from_value(record.clone()) {
            Ok(article) => return Ok((article, false)),
            Err(Error::MissingField(field)) => field,
            Err(e) => return Err(e),
        };

        logger.warn(&format!("Missing field '{}', looking for an alternate", field));
        let mut map = match record {
            Value::Object(map) => map,
            _ => return Err(Error::MissingField(field)),
        };
        let repairs = repair_record(&mut map);
        if repairs.is_empty() {
            return Err(Error::MissingField(field));
        }
        for repair in &repairs {
            logger.info(&format!("🩹 Using '{}' as '{}'", repair.from, repair.field));
        }

        // The input is only rewritten once the repaired record parses.
        let record = Value::Object(map);
        let article = Article::from_value(record.clone())?;
        self.store.write(Stage::Input, name, &record).await?;
        Ok((article, true))
    }

    async fn outputs_exist(&self, translated: &str, formatted: Option<&str>) -> Result<bool> {
        if !self.store.exists(Stage::Translated, translated).await? {
            return Ok(false);
        }
        match formatted {
            Some(formatted) => self.store.exists(Stage::Formatted, formatted).await,
            None => Ok(true),
        }
    }

    async fn save_report(&self, report: &RunReport, logger: &Logger) -> Result<()> {
        let name = report.file_name();
        self.store
            .write(Stage::Report, &name, &serde_json::to_value(report)?)
            .await?;
        logger.info(&format!("📄 Report saved to {}", self.location(Stage::Report, &name)));
        Ok(())
    }

    fn location(&self, stage: Stage, name: &str) -> String {
        self.store.locate(stage, name).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_format::DeterministicFormatter;
    use pf_inference::translate::FallbackTranslator;
    use pf_storage::MemoryStore;
    use serde_json::json;

    fn manager(store: &MemoryStore, config: PipelineConfig) -> PipelineManager {
        PipelineManager::new(
            Arc::new(store.clone()),
            Arc::new(FallbackTranslator::default()),
            Some(Arc::new(DeterministicFormatter::new())),
            config,
        )
    }

    #[test]
    fn test_output_names() {
        assert_eq!(translated_name("a.json"), "translated_a.json");
        assert_eq!(formatted_name("sanity", "translated_a.json"), "sanity_translated_a.json");
        assert_eq!(formatted_name("cms", "translated_b.json"), "cms_translated_b.json");
    }

    #[tokio::test]
    async fn test_limit_applies_in_name_order() {
        let store = MemoryStore::new();
        for name in ["c.json", "a.json", "b.json"] {
            store
                .insert(Stage::Input, name, json!({"title": name, "excerpt": "E", "content": "C"}))
                .await;
        }
        let config = PipelineConfig {
            limit: Some(2),
            ..PipelineConfig::default()
        };
        let report = manager(&store, config).run().await.unwrap();

        assert_eq!(report.total_files, 2);
        assert!(store.get(Stage::Translated, "translated_a.json").await.is_some());
        assert!(store.get(Stage::Translated, "translated_b.json").await.is_some());
        assert!(store.get(Stage::Translated, "translated_c.json").await.is_none());
    }

    #[tokio::test]
    async fn test_skip_and_force() {
        let store = MemoryStore::new();
        store
            .insert(Stage::Input, "a.json", json!({"title": "A", "excerpt": "E", "content": "C"}))
            .await;

        let first = manager(&store, PipelineConfig::default()).run().await.unwrap();
        assert!(!first.successes[0].skipped);

        let second = manager(&store, PipelineConfig::default()).run().await.unwrap();
        assert!(second.successes[0].skipped);

        let forced = PipelineConfig {
            force: true,
            ..PipelineConfig::default()
        };
        let third = manager(&store, forced).run().await.unwrap();
        assert!(!third.successes[0].skipped);
    }

    #[tokio::test]
    async fn test_missing_input() {
        let store = MemoryStore::without_input();
        let result = manager(&store, PipelineConfig::default()).run().await;
        assert!(matches!(result, Err(Error::MissingInputDir(_))));

        let reports = store.list(Stage::Report).await.unwrap();
        assert_eq!(reports.len(), 1);
        let report = store.get(Stage::Report, &reports[0]).await.unwrap();
        assert_eq!(report["total_files"], 0);
        assert_eq!(report["success_count"], 0);
    }

    #[tokio::test]
    async fn test_unrepairable_file_is_left_alone() {
        let store = MemoryStore::new();
        let record = json!({"title": "A", "excerpt": "E"});
        store.insert(Stage::Input, "a.json", record.clone()).await;

        let report = manager(&store, PipelineConfig::default()).run().await.unwrap();
        assert_eq!(report.error_count, 1);
        assert!(report.errors[0].error.contains("content"));
        assert_eq!(store.get(Stage::Input, "a.json").await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_partial_repair_leaves_input_untouched() {
        let store = MemoryStore::new();
        let record = json!({"content": "C", "summary": "S"});
        store.insert(Stage::Input, "a.json", record.clone()).await;

        let report = manager(&store, PipelineConfig::default()).run().await.unwrap();
        assert_eq!(report.error_count, 1);
        assert!(report.errors[0].error.contains("title"));
        assert_eq!(store.get(Stage::Input, "a.json").await.unwrap(), record);
        assert!(store.get(Stage::Translated, "translated_a.json").await.is_none());
    }
}
