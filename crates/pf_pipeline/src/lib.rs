pub mod cli;
pub mod logging;
pub mod manager;
pub mod repair;

pub use cli::{handle_command, OracleArgs, Outcome, PipelineCommands, RunArgs};
pub use logging::{init_logging, Logger};
pub use manager::{PipelineConfig, PipelineManager};

pub mod prelude {
    pub use super::manager::{formatted_name, translated_name, PipelineConfig, PipelineManager};
    pub use pf_core::{Article, Error, Result, RunReport};
}
