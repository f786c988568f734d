//! Driving `docker-compose` as a child process.
//!
//! This module wraps process spawning behind the small [`ComposeRunner`] trait
//! seam so the build/up/down sequencing can be unit-tested without Docker.
//! [`ProcessRunner`] is the production implementation: it blocks until the
//! child exits and lets the child write straight to this process's terminal.

use std::io;
use std::process::{Command, Stdio};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use crate::dotenv::EnvVars;
use crate::error::{ComposeError, ExitOutcome, Result};

/// A compose subcommand this tool runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    /// `build .`
    Build,
    /// `up`
    Up,
    /// `down`
    Down,
}

impl ComposeAction {
    /// Return the arguments passed to the compose program.
    #[must_use]
    pub const fn args(self) -> &'static [&'static str] {
        match self {
            Self::Build => &["build", "."],
            Self::Up => &["up"],
            Self::Down => &["down"],
        }
    }

    fn failure(self, program: &str, outcome: ExitOutcome) -> ComposeError {
        let program_name = program.to_owned();
        match self {
            Self::Build => ComposeError::BuildFailed {
                program: program_name,
                outcome,
            },
            Self::Up => ComposeError::UpFailed {
                program: program_name,
                outcome,
            },
            Self::Down => ComposeError::DownFailed {
                program: program_name,
                outcome,
            },
        }
    }
}

/// Everything needed to spawn one compose child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeInvocation {
    program: String,
    action: ComposeAction,
    workdir: Utf8PathBuf,
    env: EnvVars,
}

impl ComposeInvocation {
    /// Describe a run of `program` with `action` in `workdir`.
    ///
    /// `env` is added on top of the inherited environment of this process.
    #[must_use]
    pub fn new(
        program: impl Into<String>,
        action: ComposeAction,
        workdir: impl Into<Utf8PathBuf>,
        env: EnvVars,
    ) -> Self {
        Self {
            program: program.into(),
            action,
            workdir: workdir.into(),
            env,
        }
    }

    /// Return the compose program.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Return the compose subcommand.
    #[must_use]
    pub const fn action(&self) -> ComposeAction {
        self.action
    }

    /// Return the child's working directory.
    #[must_use]
    pub fn workdir(&self) -> &Utf8Path {
        &self.workdir
    }

    /// Return the variables injected into the child.
    #[must_use]
    pub const fn env(&self) -> &EnvVars {
        &self.env
    }
}

/// Behaviour required to run a compose child process to completion.
pub trait ComposeRunner {
    /// Run `invocation`, blocking until the child exits.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised when the child cannot be spawned or
    /// waited on.
    fn run(&self, invocation: &ComposeInvocation) -> io::Result<ExitOutcome>;
}

/// Runs compose through `std::process::Command` with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ComposeRunner for ProcessRunner {
    fn run(&self, invocation: &ComposeInvocation) -> io::Result<ExitOutcome> {
        let status = Command::new(invocation.program())
            .args(invocation.action().args())
            .current_dir(invocation.workdir())
            .envs(invocation.env().iter())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(ExitOutcome::from(status))
    }
}

/// Sequences compose invocations for one project directory.
pub struct ComposeOrchestrator<'a, R: ComposeRunner> {
    runner: &'a R,
    program: &'a str,
    workdir: &'a Utf8Path,
}

impl<'a, R: ComposeRunner> ComposeOrchestrator<'a, R> {
    /// Create an orchestrator running `program` in `workdir` through `runner`.
    #[must_use]
    pub const fn new(runner: &'a R, program: &'a str, workdir: &'a Utf8Path) -> Self {
        Self {
            runner,
            program,
            workdir,
        }
    }

    /// Build the images, then bring the stack up.
    ///
    /// `up` is only attempted after `build` exits successfully.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::BuildFailed` or `ComposeError::UpFailed` when
    /// the matching step exits unsuccessfully, and `ComposeError::SpawnFailed`
    /// when the program cannot be started.
    pub fn start(&self, env: &EnvVars) -> Result<()> {
        self.execute(ComposeAction::Build, env)?;
        self.execute(ComposeAction::Up, env)
    }

    /// Bring the stack down, then clean up.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::DownFailed` when `down` exits unsuccessfully and
    /// `ComposeError::SpawnFailed` when the program cannot be started.
    pub fn teardown(&self, env: &EnvVars) -> Result<()> {
        self.execute(ComposeAction::Down, env)?;
        cleanup(self.workdir)
    }

    /// Run a single compose action, mapping a non-zero exit to its error.
    ///
    /// # Errors
    ///
    /// Returns the failure variant for `action`, or
    /// `ComposeError::SpawnFailed`.
    pub fn execute(&self, action: ComposeAction, env: &EnvVars) -> Result<()> {
        let invocation = ComposeInvocation::new(self.program, action, self.workdir, env.clone());
        info!(program = self.program, args = ?action.args(), "running compose");

        let outcome = self
            .runner
            .run(&invocation)
            .map_err(|e| ComposeError::SpawnFailed {
                program: self.program.to_owned(),
                message: e.to_string(),
            })?;

        if outcome.success() {
            Ok(())
        } else {
            Err(action.failure(self.program, outcome).into())
        }
    }
}

/// Remove files the run left in the project directory.
///
/// Nothing is created yet, so there is nothing to remove.
#[expect(
    clippy::unnecessary_wraps,
    reason = "teardown keeps a fallible cleanup step for temporary directories"
)]
fn cleanup(workdir: &Utf8Path) -> Result<()> {
    debug!(%workdir, "cleanup: nothing to remove");
    Ok(())
}
