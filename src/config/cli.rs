//! Command-line argument definitions for loadenv.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for loadenv.
#[derive(Debug, Parser)]
#[command(name = "loadenv")]
#[command(
    author,
    version,
    about = "Load a .env file and start the project's docker-compose stack"
)]
pub struct Cli {
    /// Subcommand to execute. Defaults to `up`.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file (default is $HOME/.loadenv.toml).
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Dotenv file with environment variables (default is .env).
    #[arg(long, global = true)]
    pub dotenv: Option<Utf8PathBuf>,

    /// Compose executable to invoke instead of docker-compose.
    #[arg(long, global = true)]
    pub compose_program: Option<String>,

    /// Toggle flag; accepted for compatibility and ignored.
    #[arg(short, long)]
    pub toggle: bool,
}

impl Cli {
    /// Returns the subcommand to run, treating a bare invocation as `up`.
    #[must_use]
    pub fn command_or_default(&self) -> Commands {
        self.command.unwrap_or(Commands::Up)
    }
}

/// Available subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Load the env file, then build and start the compose stack.
    Up,

    /// Stop the compose stack and clean up.
    Down,
}
