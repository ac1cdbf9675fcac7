//! config-env command line tool
//!
//! Loads a schema file, resolves each value from defaults, the local YAML
//! file and the environment, and reports validation results.

use anyhow::Result;
use clap::Parser;
use config_env::cli::{Cli, Outcome, run};
use config_env::logging::{LogDestination, init_tracing};
use std::process::ExitCode;
use tracing::debug;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(&LogDestination::parse(&cli.log), cli.verbose)?;
    debug!(schema = %cli.schema.display(), "Starting config-env");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&cli, &mut out)? {
        Outcome::Ok => Ok(ExitCode::SUCCESS),
        Outcome::Invalid => Ok(ExitCode::from(2)),
    }
}
