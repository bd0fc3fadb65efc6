use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pf_core::{ArticleStore, Error, Result, Stage};
use serde_json::Value;
use tracing::debug;

use crate::StoreConfig;

/// One pretty-printed JSON file per document, one directory per stage.
#[derive(Debug, Clone)]
pub struct FsStore {
    config: StoreConfig,
}

impl FsStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn dir(&self, stage: Stage) -> &Path {
        match stage {
            Stage::Input => &self.config.input,
            Stage::Translated => &self.config.translated,
            Stage::Formatted => &self.config.formatted,
            Stage::Report => &self.config.reports,
        }
    }
}

#[async_trait]
impl ArticleStore for FsStore {
    async fn check_input(&self) -> Result<()> {
        match tokio::fs::metadata(&self.config.input).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(Error::MissingInputDir(self.config.input.clone())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::MissingInputDir(self.config.input.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, stage: Stage) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(self.dir(stage)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn exists(&self, stage: Stage, name: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.locate(stage, name)).await?)
    }

    async fn read(&self, stage: Stage, name: &str) -> Result<Value> {
        let raw = tokio::fs::read_to_string(self.locate(stage, name)).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn write(&self, stage: Stage, name: &str, value: &Value) -> Result<()> {
        let dir = self.dir(stage);
        tokio::fs::create_dir_all(dir).await?;
        let path = self.locate(stage, name);
        let mut raw = serde_json::to_string_pretty(value)?;
        raw.push('\n');
        tokio::fs::write(&path, raw).await?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn locate(&self, stage: Stage, name: &str) -> PathBuf {
        self.dir(stage).join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store(root: &TempDir) -> FsStore {
        FsStore::new(StoreConfig::under(root.path()))
    }

    #[tokio::test]
    async fn test_missing_input_dir() {
        let root = TempDir::new().unwrap();
        let store = store(&root);
        assert!(matches!(store.check_input().await, Err(Error::MissingInputDir(_))));
        assert!(store.list(Stage::Input).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_filtered() {
        let root = TempDir::new().unwrap();
        let store = store(&root);
        let input = &store.config().input;
        std::fs::create_dir_all(input.join("nested.json")).unwrap();
        std::fs::write(input.join("b.json"), "{}").unwrap();
        std::fs::write(input.join("a.json"), "{}").unwrap();
        std::fs::write(input.join("notes.txt"), "skip me").unwrap();

        store.check_input().await.unwrap();
        assert_eq!(store.list(Stage::Input).await.unwrap(), vec!["a.json", "b.json"]);
    }

    #[tokio::test]
    async fn test_write_creates_dir_and_keeps_unicode() {
        let root = TempDir::new().unwrap();
        let store = store(&root);
        let doc = json!({"title": "Mineração em Águas Profundas"});

        assert!(!store.exists(Stage::Translated, "translated_a.json").await.unwrap());
        store.write(Stage::Translated, "translated_a.json", &doc).await.unwrap();
        assert!(store.exists(Stage::Translated, "translated_a.json").await.unwrap());

        let path = store.locate(Stage::Translated, "translated_a.json");
        let raw = std::fs::read_to_string(path).unwrap();
        assert!(raw.contains("Mineração em Águas Profundas"));
        assert!(raw.contains("\n  \"title\""));
        assert_eq!(store.read(Stage::Translated, "translated_a.json").await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_read_invalid_json() {
        let root = TempDir::new().unwrap();
        let store = store(&root);
        std::fs::create_dir_all(&store.config().input).unwrap();
        std::fs::write(store.locate(Stage::Input, "bad.json"), "{not json").unwrap();
        assert!(matches!(
            store.read(Stage::Input, "bad.json").await,
            Err(Error::Serialization(_))
        ));
    }
}
