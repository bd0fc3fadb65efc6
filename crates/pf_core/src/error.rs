use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Oracle timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Oracle invocation failed: {0}")]
    Invocation(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Input directory not found: {}", .0.display())]
    MissingInputDir(PathBuf),
}

impl Error {
    /// True for failures of the oracle itself (it could not be reached or did
    /// not answer in time), as opposed to a reply that could not be used.
    pub fn is_oracle_failure(&self) -> bool {
        matches!(
            self,
            Error::Unavailable(_) | Error::Timeout(_) | Error::Invocation(_)
        )
    }
}
