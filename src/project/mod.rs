//! Project file resolution.
//!
//! Before anything touches a child process, the runner confirms that the env
//! file and the `Dockerfile` exist. [`ProjectLayout::resolve`] performs both
//! checks, in that order, and returns the paths the later stages use.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::error::{ProjectError, ProjectFile, Result};

/// Env file name used when no explicit path is configured.
pub const DEFAULT_DOTENV: &str = ".env";

/// Build recipe that must sit in the working directory.
pub const DOCKERFILE: &str = "Dockerfile";

/// Verified locations of the files a run depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    workdir: Utf8PathBuf,
    dotenv: Utf8PathBuf,
    dockerfile: Utf8PathBuf,
}

impl ProjectLayout {
    /// Resolve and verify the env file and `Dockerfile` for `workdir`.
    ///
    /// `explicit` overrides the default `.env`; relative paths are taken
    /// relative to `workdir`.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` naming the env file when it is not a
    /// regular file, or naming the `Dockerfile` when that is missing. The env
    /// file is checked first.
    pub fn resolve(workdir: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self> {
        let dotenv = dotenv_path(workdir, explicit);
        if !dotenv.is_file() {
            return Err(ProjectError::NotFound {
                kind: ProjectFile::Dotenv,
                path: dotenv,
            }
            .into());
        }

        let dockerfile = workdir.join(DOCKERFILE);
        if !dockerfile.is_file() {
            return Err(ProjectError::NotFound {
                kind: ProjectFile::Dockerfile,
                path: dockerfile,
            }
            .into());
        }

        debug!(%dotenv, %dockerfile, "project files resolved");
        Ok(Self {
            workdir: workdir.to_path_buf(),
            dotenv,
            dockerfile,
        })
    }

    /// Return the working directory the layout was resolved against.
    #[must_use]
    pub fn workdir(&self) -> &Utf8Path {
        &self.workdir
    }

    /// Return the effective env file path.
    #[must_use]
    pub fn dotenv(&self) -> &Utf8Path {
        &self.dotenv
    }

    /// Return the `Dockerfile` path.
    #[must_use]
    pub fn dockerfile(&self) -> &Utf8Path {
        &self.dockerfile
    }
}

/// Return the env file path for `workdir` without checking that it exists.
///
/// `explicit` overrides the default `.env`; relative paths are joined onto
/// `workdir`, and `..` components are kept as given.
#[must_use]
pub fn dotenv_path(workdir: &Utf8Path, explicit: Option<&Utf8Path>) -> Utf8PathBuf {
    workdir.join(explicit.unwrap_or_else(|| Utf8Path::new(DEFAULT_DOTENV)))
}

/// Return the process working directory as a UTF-8 path.
///
/// # Errors
///
/// Returns `ProjectError::WorkdirUnavailable` when the directory cannot be
/// read or is not valid UTF-8.
pub fn current_workdir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| ProjectError::WorkdirUnavailable {
        message: e.to_string(),
    })?;
    Utf8PathBuf::try_from(cwd).map_err(|e| {
        ProjectError::WorkdirUnavailable {
            message: format!("not valid UTF-8: {}", e.as_path().display()),
        }
        .into()
    })
}
