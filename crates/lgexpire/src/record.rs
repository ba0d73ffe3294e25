//! Core types describing a rotated log file.
//!
//! This module provides:
//! - [`LogLevel`] — The fixed set of glog severity levels
//! - [`Compression`] — Recognized compression suffixes
//! - [`LogRecord`] — Metadata recovered from one log filename

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Log severity levels written by glog-style loggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Informational messages
    Info,
    /// Warning conditions
    Warning,
    /// Error conditions
    Error,
    /// Fatal conditions
    Fatal,
}

impl LogLevel {
    /// Every level, in severity order.
    pub const ALL: [Self; 4] = [Self::Info, Self::Warning, Self::Error, Self::Fatal];

    /// Returns the token used in filenames.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ParseError;

    /// Case-sensitive: `info` is not a level.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ParseError::UnsupportedLevel(s.to_string()))
    }
}

/// Compression suffix appended to a rotated log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// gzip, `.gz`
    Gz,
}

impl Compression {
    /// Every recognized suffix.
    pub const ALL: [Self; 1] = [Self::Gz];

    /// Returns the suffix without the leading dot.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gz => "gz",
        }
    }

    /// Looks up a filename field, returning `None` if it is not a known suffix.
    #[must_use]
    pub fn from_suffix(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == field)
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of one managed log file.
///
/// Only [`crate::parser::parse`] creates records, so a `LogRecord` always
/// describes a filename that matched the naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Path as it was handed to the parser
    pub filename: PathBuf,
    /// Program name, may itself contain dots
    pub program: String,
    /// Host that wrote the file
    pub host: String,
    /// User the program ran as
    pub username: String,
    /// Severity level of the file
    pub level: LogLevel,
    /// Time the file was created, second resolution
    pub timestamp: DateTime<Utc>,
    /// Process id, `0` when the pid field was not numeric
    pub pid: u64,
    /// Compression suffix, if any
    pub extension: Option<Compression>,
}

impl LogRecord {
    /// Parses a log filename.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the name does not follow the convention.
    pub fn parse(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        crate::parser::parse(path)
    }

    /// Returns true if the file carries a compression suffix.
    #[must_use]
    pub const fn is_compressed(&self) -> bool {
        self.extension.is_some()
    }
}

impl TryFrom<&Path> for LogRecord {
    type Error = ParseError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        crate::parser::parse(path)
    }
}
