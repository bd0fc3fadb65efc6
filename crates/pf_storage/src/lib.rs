use std::path::PathBuf;

pub mod backends;

pub use backends::*;

/// Directory per pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub input: PathBuf,
    pub translated: PathBuf,
    pub formatted: PathBuf,
    pub reports: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("posts_to_translate"),
            translated: PathBuf::from("posts_translated"),
            formatted: PathBuf::from("posts_formatted"),
            reports: PathBuf::from("reports"),
        }
    }
}

impl StoreConfig {
    /// All four stage directories under one root.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let defaults = Self::default();
        Self {
            input: root.join(defaults.input),
            translated: root.join(defaults.translated),
            formatted: root.join(defaults.formatted),
            reports: root.join(defaults.reports),
        }
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::StoreConfig;
    pub use pf_core::{ArticleStore, Stage};
}
