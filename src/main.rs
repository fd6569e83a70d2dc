//! Cargo manifest intake: readiness gate and workflow orchestration.
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod console;
mod grid;
mod notify;
mod readiness;
mod services;
mod storage;
mod theme;
mod util;
mod workflow;

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "VORTEX_LOG";

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = cli::RootArgs::parse();
    init_tracing(args.verbose);

    match &args.command {
        cli::Command::Check(args) => workflow::run_check(args),
        cli::Command::Session(args) => workflow::run_session(args),
    }
}
