//! Orchestration API for loadenv commands.
//!
//! This module provides the library-level operations behind each command:
//! [`up`] and [`down`]. They contain the business logic the CLI binary
//! dispatches to, making it available to library embedders as well.
//!
//! All functions accept library-owned types (not clap types) and return
//! [`crate::error::Result`]. They do not print to stdout/stderr or call
//! `std::process::exit`; the compose children write to the inherited
//! terminal directly.

use camino::Utf8Path;
use tracing::{debug, info};

use crate::compose::{ComposeOrchestrator, ComposeRunner};
use crate::config::AppConfig;
use crate::dotenv::{DotenvFile, EnvVars};
use crate::error::Result as LoadenvResult;
use crate::project::{ProjectLayout, dotenv_path};

/// Load the env file and start the compose stack in `workdir`.
///
/// Steps run strictly in order: resolve the env file and `Dockerfile`, parse
/// the env file, run `build`, run `up`. Any failure stops the sequence, and
/// nothing is spawned before both files are found and the env file parses.
///
/// # Errors
///
/// Returns `LoadenvError` variants:
/// - `ConfigError::InvalidValue` if the compose program is blank.
/// - `ProjectError::NotFound` if the env file or `Dockerfile` is missing.
/// - `DotenvError::MalformedLine` / `ReadFailed` if the env file is unusable.
/// - `ComposeError::BuildFailed` / `UpFailed` / `SpawnFailed` from compose.
pub fn up<R: ComposeRunner>(
    config: &AppConfig,
    workdir: &Utf8Path,
    runner: &R,
) -> LoadenvResult<()> {
    config.compose.validate()?;

    let layout = ProjectLayout::resolve(workdir, config.dotenv.as_deref().map(Utf8Path::new))?;
    let vars = DotenvFile::new(layout.dotenv()).load()?;
    info!(path = %layout.dotenv(), count = vars.len(), "loaded environment");

    ComposeOrchestrator::new(runner, &config.compose.program, layout.workdir()).start(&vars)
}

/// Stop the compose stack in `workdir` and clean up.
///
/// The configured env file is loaded when it exists so `down` addresses the
/// same project `up` started (for example through `COMPOSE_PROJECT_NAME`). A
/// missing env file is not an error, and no `Dockerfile` is required.
///
/// # Errors
///
/// Returns `LoadenvError` variants:
/// - `ConfigError::InvalidValue` if the compose program is blank.
/// - `DotenvError::MalformedLine` / `ReadFailed` if an existing env file is
///   unusable.
/// - `ComposeError::DownFailed` / `SpawnFailed` from compose.
pub fn down<R: ComposeRunner>(
    config: &AppConfig,
    workdir: &Utf8Path,
    runner: &R,
) -> LoadenvResult<()> {
    config.compose.validate()?;

    let path = dotenv_path(workdir, config.dotenv.as_deref().map(Utf8Path::new));
    let vars = if path.is_file() {
        let loaded = DotenvFile::new(path.as_path()).load()?;
        info!(%path, count = loaded.len(), "loaded environment");
        loaded
    } else {
        debug!(%path, "no env file; running down without extra variables");
        EnvVars::new()
    };

    ComposeOrchestrator::new(runner, &config.compose.program, workdir).teardown(&vars)
}
