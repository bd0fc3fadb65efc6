use std::sync::Arc;
use std::time::Duration;

use pf_core::Oracle;

pub mod cli;
pub mod scripted;

pub use cli::CliOracle;
pub use scripted::ScriptedOracle;

/// How to reach the oracle command-line tool.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub program: String,
    /// Arguments placed before the prompt, e.g. `-p`.
    pub prompt_args: Vec<String>,
    pub version_flag: String,
    pub timeout: Duration,
    pub version_timeout: Duration,
    /// Extra attempts after the first one fails.
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            program: "claude".to_string(),
            prompt_args: vec!["-p".to_string()],
            version_flag: "--version".to_string(),
            timeout: Duration::from_secs(60),
            version_timeout: Duration::from_secs(5),
            retries: 2,
            retry_delay: Duration::from_secs(3),
        }
    }
}

impl OracleConfig {
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

/// Build the oracle for a run. Offline runs get an oracle that reports itself
/// unavailable, so no process is ever spawned.
pub fn create_oracle(config: &OracleConfig, offline: bool) -> Arc<dyn Oracle> {
    if offline {
        Arc::new(ScriptedOracle::unavailable())
    } else {
        Arc::new(CliOracle::new(config.clone()))
    }
}
