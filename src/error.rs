//! Semantic error types for the loadenv application.
//!
//! This module defines the error hierarchy for loadenv, following the principle of
//! using semantic error enums (via `thiserror`) for conditions the caller might
//! inspect, while reserving opaque errors (`eyre::Report`) for the application
//! boundary.

use std::fmt;
use std::process::ExitStatus;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the expected path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: Utf8PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error while merging layers.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// The project files that must exist before anything runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFile {
    /// The env file holding `NAME=VALUE` lines.
    Dotenv,
    /// The `Dockerfile` in the working directory.
    Dockerfile,
}

impl fmt::Display for ProjectFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dotenv => f.write_str("env file"),
            Self::Dockerfile => f.write_str("Dockerfile"),
        }
    }
}

/// Errors raised while resolving the project layout.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// A required project file does not exist.
    #[error("cannot find {kind} at {path}")]
    NotFound {
        /// Which project file is missing.
        kind: ProjectFile,
        /// The path that was checked.
        path: Utf8PathBuf,
    },

    /// The working directory could not be determined or is not UTF-8.
    #[error("working directory unavailable: {message}")]
    WorkdirUnavailable {
        /// A description of the failure.
        message: String,
    },
}

/// Errors raised while reading an env file.
#[derive(Debug, Error)]
pub enum DotenvError {
    /// A non-comment, non-blank line has no `NAME=` prefix.
    #[error("malformed line {line_number} in {path}: '{line}' (expected NAME=VALUE)")]
    MalformedLine {
        /// The env file being read.
        path: Utf8PathBuf,
        /// One-based line number of the offending line.
        line_number: usize,
        /// The offending line, verbatim.
        line: String,
    },

    /// The env file could not be opened or read.
    #[error("failed to read {path}: {message}")]
    ReadFailed {
        /// The env file being read.
        path: Utf8PathBuf,
        /// A description of the I/O failure.
        message: String,
    },
}

/// How a child process finished, when it did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The process exited with the given status code.
    Code(i32),
    /// The process was terminated by a signal.
    Signal,
}

impl ExitOutcome {
    /// Returns whether this outcome represents a successful exit.
    #[must_use]
    pub const fn success(self) -> bool {
        matches!(self, Self::Code(0))
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        status.code().map_or(Self::Signal, Self::Code)
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "exit code {code}"),
            Self::Signal => f.write_str("termination by signal"),
        }
    }
}

/// Errors raised while driving `docker-compose`.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The compose program could not be started at all.
    #[error("failed to run '{program}': {message}")]
    SpawnFailed {
        /// The program that was invoked.
        program: String,
        /// A description of the spawn failure.
        message: String,
    },

    /// `docker-compose build` did not succeed.
    #[error("'{program} build' failed with {outcome}")]
    BuildFailed {
        /// The program that was invoked.
        program: String,
        /// How the build process finished.
        outcome: ExitOutcome,
    },

    /// `docker-compose up` did not succeed.
    #[error("'{program} up' failed with {outcome}")]
    UpFailed {
        /// The program that was invoked.
        program: String,
        /// How the up process finished.
        outcome: ExitOutcome,
    },

    /// `docker-compose down` did not succeed.
    #[error("'{program} down' failed with {outcome}")]
    DownFailed {
        /// The program that was invoked.
        program: String,
        /// How the down process finished.
        outcome: ExitOutcome,
    },
}

/// Top-level error type for the loadenv application.
///
/// At the application boundary (main.rs) these errors are converted to
/// `eyre::Report` for human-readable error reporting.
#[derive(Debug, Error)]
pub enum LoadenvError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while resolving project files.
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// An error occurred while reading the env file.
    #[error(transparent)]
    Dotenv(#[from] DotenvError),

    /// An error occurred while running `docker-compose`.
    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// A specialised `Result` type for loadenv operations.
pub type Result<T> = std::result::Result<T, LoadenvError>;
