//! Enikki CLI binary.
//!
//! Runs one weekly digest and exits. The exit status is non-zero only when
//! the run failed; an empty week is a success.

use clap::Parser;
use enikki::{Cli, EnikkiConfig, LogFormat, init_telemetry, run_once};
use enikki_digest::RunOutcome;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is fine; the variables may come from the real environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = EnikkiConfig::load(cli.config.as_deref());

    let format = config
        .as_ref()
        .map(|c| *c.logging().format())
        .unwrap_or(LogFormat::Pretty);
    if let Err(e) = init_telemetry(cli.verbose, format) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(dry_run = cli.dry_run, "Starting weekly digest");
    match run_once(&config, cli.dry_run).await {
        Ok(RunOutcome::NothingToReport) => {
            info!("Nothing to report this week");
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            info!(outcome = ?outcome, "Weekly digest complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Weekly digest failed");
            ExitCode::FAILURE
        }
    }
}
