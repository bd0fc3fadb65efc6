use std::fmt;
use std::process::Stdio;

use async_trait::async_trait;
use pf_core::{Error, Oracle, Result};
use tokio::process::Command;
use tokio::sync::OnceCell;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use super::OracleConfig;

/// Runs the oracle as a child process, one process per prompt.
pub struct CliOracle {
    config: OracleConfig,
    availability: OnceCell<bool>,
}

impl CliOracle {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            config,
            availability: OnceCell::new(),
        }
    }

    async fn probe(&self) -> bool {
        let mut command = Command::new(&self.config.program);
        command
            .arg(&self.config.version_flag)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match timeout(self.config.version_timeout, command.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                info!(
                    "🧠 Oracle available: {}",
                    String::from_utf8_lossy(&output.stdout).trim()
                );
                true
            }
            Ok(Ok(output)) => {
                error!(
                    "Oracle {} is not usable ({}): {}",
                    self.config.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                false
            }
            Ok(Err(e)) => {
                error!("Failed to run {}: {}", self.config.program, e);
                false
            }
            Err(_) => {
                error!(
                    "Oracle {} did not answer {} within {:?}",
                    self.config.program, self.config.version_flag, self.config.version_timeout
                );
                false
            }
        }
    }

    async fn run_once(&self, prompt: &str) -> Result<String> {
        // The prompt travels as one argv entry; no shell ever sees it.
        let child = Command::new(&self.config.program)
            .args(&self.config.prompt_args)
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::Unavailable(format!("failed to start {}: {}", self.config.program, e))
            })?;

        let output = match timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => return Err(Error::Timeout(self.config.timeout)),
        };

        if !output.status.success() {
            return Err(Error::Invocation(format!(
                "{} exited with {}: {}",
                self.config.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl fmt::Debug for CliOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliOracle")
            .field("program", &self.config.program)
            .field("timeout", &self.config.timeout)
            .field("retries", &self.config.retries)
            .finish()
    }
}

#[async_trait]
impl Oracle for CliOracle {
    fn name(&self) -> &str {
        &self.config.program
    }

    async fn check_availability(&self) -> bool {
        *self.availability.get_or_init(|| self.probe()).await
    }

    async fn send_prompt(&self, prompt: &str) -> Result<String> {
        let attempts = self.config.retries + 1;
        let mut last_error = None;

        for attempt in 1..=attempts {
            debug!("Sending prompt ({} chars), attempt {}/{}", prompt.chars().count(), attempt, attempts);
            match self.run_once(prompt).await {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    warn!("Oracle call failed (attempt {}/{}): {}", attempt, attempts, e);
                    last_error = Some(e);
                    if attempt < attempts {
                        info!("Retrying in {:?}...", self.config.retry_delay);
                        sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::Unavailable(format!("{} failed after all retries", self.config.program))
        }))
    }
}
