use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::Result;

/// The collections a pipeline run reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Input,
    Translated,
    Formatted,
    Report,
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Fail with `Error::MissingInputDir` when there is nothing to read from
    async fn check_input(&self) -> Result<()>;

    /// Names of the JSON documents in a stage, sorted
    async fn list(&self, stage: Stage) -> Result<Vec<String>>;

    async fn exists(&self, stage: Stage, name: &str) -> Result<bool>;

    async fn read(&self, stage: Stage, name: &str) -> Result<Value>;

    /// Write a document, replacing any previous version
    async fn write(&self, stage: Stage, name: &str, value: &Value) -> Result<()>;

    /// Where a document lives, for reporting
    fn locate(&self, stage: Stage, name: &str) -> PathBuf;
}
