//! Configuration system for loadenv.
//!
//! This module provides the configuration structures and CLI definitions for the
//! loadenv application. Configuration loading and precedence merging is handled by
//! the `ortho_config` crate. Precedence: CLI flags override environment
//! variables, which override the settings file, which overrides defaults.
//!
//! The settings file is discovered as `.loadenv.toml` (or `.yaml`, `.yml`,
//! `.json`) in the working or home directory, or at the path given by
//! `--config` or `LOADENV_CONFIG_PATH`.
//!
//! # Example Configuration
//!
//! ```toml
//! dotenv = ".env.local"
//!
//! [compose]
//! program = "docker-compose"
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use types::{AppConfig, ComposeConfig, DEFAULT_COMPOSE_PROGRAM};
