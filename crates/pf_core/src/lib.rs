pub mod error;
pub mod models;
pub mod report;
pub mod storage;
pub mod types;

pub use error::Error;
pub use models::{DocumentFormatter, Oracle, Translator};
pub use report::{FileFailure, FileSuccess, RunReport};
pub use storage::{ArticleStore, Stage};
pub use types::*;

pub type Result<T> = std::result::Result<T, Error>;
