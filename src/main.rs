//! `loadenv` application entry point.
//!
//! This binary loads a project's env file and drives `docker-compose` with it.
//! It uses `eyre` for opaque error handling at the application boundary,
//! converting domain-specific errors into human-readable reports. Any error
//! returned from `main` exits the process with status 1.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Settings file (`.loadenv.toml` in the working or home directory, or the
//!    path from `--config` / `LOADENV_CONFIG_PATH`)
//! 3. Environment variables (`LOADENV_*`)
//! 4. Command-line arguments

use std::io;

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use loadenv::api;
use loadenv::compose::ProcessRunner;
use loadenv::config::{AppConfig, Cli, Commands, load_config};
use loadenv::error::Result as LoadenvResult;
use loadenv::project::current_workdir;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV_VAR: &str = "LOADENV_LOG";

/// Application entry point.
///
/// Loads configuration with layered precedence via `OrthoConfig`, then
/// dispatches to the selected command.
fn main() -> EyreResult<()> {
    // Parse CLI first (for subcommand dispatch and global options).
    let cli = Cli::parse();
    init_tracing();

    // Load configuration with layered precedence: defaults < file < env < CLI.
    let config = load_config(&cli).map_err(Report::from)?;

    run(&cli, &config).map_err(Report::from)
}

/// Execute the CLI command, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
fn run(cli: &Cli, config: &AppConfig) -> LoadenvResult<()> {
    let workdir = current_workdir()?;
    let runner = ProcessRunner;

    match cli.command_or_default() {
        Commands::Up => api::up(config, &workdir, &runner),
        Commands::Down => api::down(config, &workdir, &runner),
    }
}

/// Install the global `tracing` subscriber.
///
/// Diagnostics go to stderr so stdout stays with the compose children. The
/// filter comes from `LOADENV_LOG` and defaults to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
