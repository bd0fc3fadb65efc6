use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use pf_core::{ArticleStore, Error, Result, Stage};
use serde_json::Value;
use tokio::sync::RwLock;

/// In-memory store for tests and dry runs.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<Stage, BTreeMap<String, Value>>>>,
    has_input: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            has_input: true,
        }
    }

    /// A store whose input collection does not exist.
    pub fn without_input() -> Self {
        Self {
            has_input: false,
            ..Self::new()
        }
    }

    pub async fn insert(&self, stage: Stage, name: &str, value: Value) {
        self.documents
            .write()
            .await
            .entry(stage)
            .or_default()
            .insert(name.to_string(), value);
    }

    pub async fn get(&self, stage: Stage, name: &str) -> Option<Value> {
        self.documents
            .read()
            .await
            .get(&stage)
            .and_then(|docs| docs.get(name).cloned())
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn check_input(&self) -> Result<()> {
        if self.has_input {
            Ok(())
        } else {
            Err(Error::MissingInputDir(self.locate(Stage::Input, "")))
        }
    }

    async fn list(&self, stage: Stage) -> Result<Vec<String>> {
        // BTreeMap keys come out sorted.
        Ok(self
            .documents
            .read()
            .await
            .get(&stage)
            .map(|docs| docs.keys().filter(|n| n.ends_with(".json")).cloned().collect())
            .unwrap_or_default())
    }

    async fn exists(&self, stage: Stage, name: &str) -> Result<bool> {
        Ok(self.get(stage, name).await.is_some())
    }

    async fn read(&self, stage: Stage, name: &str) -> Result<Value> {
        self.get(stage, name).await.ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", self.locate(stage, name).display()),
            ))
        })
    }

    async fn write(&self, stage: Stage, name: &str, value: &Value) -> Result<()> {
        self.insert(stage, name, value.clone()).await;
        Ok(())
    }

    fn locate(&self, stage: Stage, name: &str) -> PathBuf {
        let dir = match stage {
            Stage::Input => "memory://input",
            Stage::Translated => "memory://translated",
            Stage::Formatted => "memory://formatted",
            Stage::Report => "memory://reports",
        };
        PathBuf::from(dir).join(name)
    }
}
