//! Env file parsing.
//!
//! An env file is plain text. Each line is a comment (`#` prefix), blank, or
//! `NAME=VALUE`. The name is everything before the first `=` and the value is
//! everything after it, verbatim: there is no quoting, escaping, trimming or
//! `${VAR}` expansion.
//!
//! Loading never writes to this process's environment. The result is an
//! [`EnvVars`] set that the compose runner injects into each child process.

use std::io::{self, BufRead, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::File;
use tracing::debug;

use crate::error::{DotenvError, Result};

/// One `NAME=VALUE` pair from an env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    name: String,
    value: String,
}

impl EnvEntry {
    /// Create an entry from a name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Return the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the variable value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// How a single env file line is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// The line starts with `#`.
    Comment,
    /// The line is empty or whitespace only.
    Blank,
    /// The line holds a variable.
    Entry(EnvEntry),
    /// The line has no `=`, or nothing before it.
    Malformed,
}

/// Classify one line of an env file.
///
/// A line is a comment only when `#` is its very first character.
#[must_use]
pub fn classify_line(line: &str) -> ParsedLine {
    if line.starts_with('#') {
        return ParsedLine::Comment;
    }
    if line.trim().is_empty() {
        return ParsedLine::Blank;
    }
    match line.split_once('=') {
        Some((name, value)) if !name.is_empty() => ParsedLine::Entry(EnvEntry::new(name, value)),
        _ => ParsedLine::Malformed,
    }
}

/// Ordered variables loaded from an env file.
///
/// Entries keep file order. A repeated name is kept twice; when applied to a
/// child process the later entry wins, and [`EnvVars::get`] reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    entries: Vec<EnvEntry>,
}

impl EnvVars {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry.
    pub fn push(&mut self, entry: EnvEntry) {
        self.entries.push(entry);
    }

    /// Return the effective value for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.name == name)
            .map(EnvEntry::value)
    }

    /// Iterate over `(name, value)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.value.as_str()))
    }

    /// Return the number of entries, counting repeats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether no entries were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<EnvEntry> for EnvVars {
    fn from_iter<I: IntoIterator<Item = EnvEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// An env file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotenvFile {
    path: Utf8PathBuf,
}

impl DotenvFile {
    /// Wrap the env file at `path`. Nothing is opened yet.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Return the path of the env file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Open the file and return its lines.
    ///
    /// Every call reopens the file, so each iterator starts from the first
    /// line. An iterator cannot be rewound.
    ///
    /// # Errors
    ///
    /// Returns `DotenvError::ReadFailed` when the file cannot be opened.
    pub fn lines(&self) -> Result<io::Lines<BufReader<File>>> {
        let file = self.open().map_err(|e| self.read_failed(&e))?;
        Ok(BufReader::new(file).lines())
    }

    /// Read every variable from the file.
    ///
    /// The whole file is parsed before anything is returned, so a malformed
    /// line means no variables from this file reach any child process.
    ///
    /// # Errors
    ///
    /// Returns `DotenvError::MalformedLine` for the first line that is neither
    /// a comment, blank, nor `NAME=VALUE`, and `DotenvError::ReadFailed` for
    /// I/O failures, including invalid UTF-8.
    pub fn load(&self) -> Result<EnvVars> {
        let mut vars = EnvVars::new();
        for (index, line) in self.lines()?.enumerate() {
            let text = line.map_err(|e| self.read_failed(&e))?;
            match classify_line(&text) {
                ParsedLine::Comment | ParsedLine::Blank => {}
                ParsedLine::Entry(entry) => vars.push(entry),
                ParsedLine::Malformed => {
                    return Err(DotenvError::MalformedLine {
                        path: self.path.clone(),
                        line_number: index + 1,
                        line: text,
                    }
                    .into());
                }
            }
        }
        debug!(path = %self.path, count = vars.len(), "env file loaded");
        Ok(vars)
    }

    /// Open the file by its full path, following symlinks the same way the
    /// `is_file` check in project resolution does.
    fn open(&self) -> io::Result<File> {
        File::open_ambient(&self.path, ambient_authority())
    }

    fn read_failed(&self, error: &io::Error) -> DotenvError {
        DotenvError::ReadFailed {
            path: self.path.clone(),
            message: error.to_string(),
        }
    }
}
