//! CLI command definitions for config-env
//!
//! This module defines the CLI structure using clap's derive macros and the
//! handlers behind each subcommand.

pub mod schema;

use crate::config::Config;
use crate::error::ConfigError;
use crate::format::{OutputFormat, format_entries, format_env_names};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use schema::SchemaFile;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default schema file name.
pub const DEFAULT_SCHEMA_FILE: &str = "config-schema.yaml";

/// Resolve and check layered configuration from defaults, a YAML file and the environment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the schema file declaring the configuration items
    #[arg(short, long, global = true, default_value = DEFAULT_SCHEMA_FILE)]
    pub schema: PathBuf,

    /// Configuration file to read (overrides the schema's `file`)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate the configuration; exit non-zero on any problem
    Check,

    /// Print every resolved value and where it came from
    Show(ShowArgs),

    /// List each key with the environment variable it is read from
    EnvNames,
}

/// Arguments for the show subcommand
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Skip validation before printing
    #[arg(long)]
    pub no_validate: bool,
}

/// Outcome of a command, mapped to the process exit status by `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Invalid,
}

/// Set up a configuration from a schema file and load file and environment.
pub fn load(schema_path: &Path, file: Option<&Path>) -> Result<Config> {
    let schema = SchemaFile::load(schema_path)?;
    let mut config = schema
        .builder(file)
        .setup()
        .context("Invalid configuration schema")?;
    config
        .read()
        .with_context(|| format!("Failed loading {}", config.file_name().display()))?;
    Ok(config)
}

/// Run a parsed command line, writing results to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<Outcome> {
    match &cli.command {
        Command::Check => {
            let config = load(&cli.schema, cli.file.as_deref())?;
            match config.validate() {
                Ok(()) => {
                    info!(items = config.items().len(), "Configuration is valid");
                    writeln!(out, "ok: {} item(s) valid", config.items().len())?;
                    Ok(Outcome::Ok)
                }
                Err(err @ ConfigError::Validation { .. }) => {
                    writeln!(out, "invalid: {}", err)?;
                    Ok(Outcome::Invalid)
                }
                Err(err) => Err(err.into()),
            }
        }
        Command::Show(args) => {
            let config = load(&cli.schema, cli.file.as_deref())?;
            let outcome = if args.no_validate || config.validate().is_ok() {
                Outcome::Ok
            } else {
                Outcome::Invalid
            };
            write!(out, "{}", format_entries(&config.entries(), args.format))?;
            Ok(outcome)
        }
        Command::EnvNames => {
            let schema = SchemaFile::load(&cli.schema)?;
            let config = schema
                .builder(cli.file.as_deref())
                .setup()
                .context("Invalid configuration schema")?;
            let pairs = config.items().iter().map(|item| (item.key(), item.env_name()));
            write!(out, "{}", format_env_names(pairs))?;
            Ok(Outcome::Ok)
        }
    }
}
