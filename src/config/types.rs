//! Configuration data types for loadenv.

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::error::ConfigError;

/// Compose executable used when nothing else is configured.
pub const DEFAULT_COMPOSE_PROGRAM: &str = "docker-compose";

/// Settings for the compose program that builds and runs the stack.
#[derive(Debug, Clone, PartialEq, Eq, SmartDefault, Deserialize, Serialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Executable name or path, resolved through `PATH` when bare.
    #[default(String::from(DEFAULT_COMPOSE_PROGRAM))]
    pub program: String,
}

impl ComposeConfig {
    /// Validates that the compose program is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `program` is empty or only
    /// whitespace.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: String::from("compose.program"),
                reason: String::from("cannot be empty"),
            }
            .into());
        }
        Ok(())
    }
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// The first settings file found is used, searching in this order:
/// 1. The `--config` path. When it is given, nothing else is searched, and a
///    missing file means no settings file is read.
/// 2. The path in the `LOADENV_CONFIG_PATH` environment variable
/// 3. `.loadenv.<ext>` in the current working directory
/// 4. `loadenv/config.<ext>` in each XDG configuration directory
/// 5. `~/.config/loadenv/config.<ext>`, then `~/.loadenv.<ext>`
///
/// Every directory is searched for all formats before moving to the next
/// one, trying `toml`, `yaml`, `yml` and `json` in that order.
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "LOADENV",
    discovery(
        app_name = "loadenv",
        env_var = "LOADENV_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".loadenv.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// Path of the env file; `.env` in the working directory when unset.
    pub dotenv: Option<String>,

    /// Compose program configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub compose: ComposeConfig,
}

impl AppConfig {
    /// Normalises values that layers may leave in an awkward shape.
    ///
    /// A blank `dotenv` is treated as unset and `compose.program` is trimmed.
    /// The loader calls this once every layer has been merged.
    pub fn normalise(&mut self) {
        if self.dotenv.as_deref().is_some_and(|path| path.trim().is_empty()) {
            self.dotenv = None;
        }
        let trimmed = self.compose.program.trim();
        if trimmed.len() != self.compose.program.len() {
            self.compose.program = trimmed.to_owned();
        }
    }
}
