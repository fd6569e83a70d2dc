//! CLI argument parsing for the intake tool.
//!
//! The CLI only wires inputs; readiness and orchestration policy live in their
//! own modules.
use crate::readiness::{PollSettings, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "vortex",
    version,
    about = "Cargo manifest intake: readiness gate and workflow session",
    after_help = "Examples:\n  vortex check --assets ./public\n  vortex check --assets ./public --json\n  vortex session --assets ./public --ephemeral < intents.txt",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Log at debug level (overridden by VORTEX_LOG)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Check(CheckArgs),
    Session(SessionArgs),
}

/// Poll interval and ceiling for the readiness gate.
#[derive(Args, Debug, Clone)]
pub struct PollArgs {
    /// Number of dependency checks before giving up
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Delay before each dependency check
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,
}

impl PollArgs {
    pub fn settings(&self) -> PollSettings {
        PollSettings {
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Wait for required assets and report readiness")]
pub struct CheckArgs {
    /// Asset directory holding vendor scripts and config.json
    #[arg(long, value_name = "DIR")]
    pub assets: PathBuf,

    #[command(flatten)]
    pub poll: PollArgs,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Run an intake session reading intents from stdin")]
pub struct SessionArgs {
    /// Asset directory holding vendor scripts and config.json
    #[arg(long, value_name = "DIR")]
    pub assets: PathBuf,

    #[command(flatten)]
    pub poll: PollArgs,

    /// Durable storage file (defaults to the user data directory)
    #[arg(long, value_name = "FILE")]
    pub storage: Option<PathBuf>,

    /// Keep storage in memory for this session only
    #[arg(long, conflicts_with = "storage")]
    pub ephemeral: bool,
}
