//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Enikki - weekly picture-diary digest for your Discord servers
///
/// Collects the past week of messages from every channel the bot can see,
/// summarizes them with Gemini, draws an illustration and posts both to the
/// configured channel. Running without arguments performs one digest run.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "enikki")]
#[command(version)]
pub struct Cli {
    /// Configuration file layered over the defaults
    #[arg(short, long, env = "ENIKKI_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Collect and generate, but do not post
    #[arg(long)]
    pub dry_run: bool,
}
