use std::process::ExitCode;

use clap::Parser;
use pf_core::Error;
use pf_pipeline::{handle_command, init_logging, OracleArgs, Outcome, PipelineCommands};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pf", author, version, about = "Translate articles and format them as Portable Text posts", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    oracle: OracleArgs,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: PipelineCommands,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let logger = init_logging(cli.verbose);

    let outcome = match handle_command(cli.command, &cli.oracle).await {
        Ok(outcome) => outcome,
        Err(e @ Error::MissingInputDir(_)) => {
            logger.error(&format!("❌ {}", e));
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    match &outcome {
        Outcome::Run(report) => info!(
            "🏁 {} of {} files processed, {} failed",
            report.success_count, report.total_files, report.error_count
        ),
        Outcome::Translated(path) => println!("{}", path.display()),
        Outcome::Available(available) => println!("{}", if *available { "available" } else { "unavailable" }),
        Outcome::Summary(summary) => println!("{}", summary),
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
