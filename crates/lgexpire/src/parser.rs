//! Filename parsing for glog-style rotated logs.
//!
//! A managed file is named
//! `<program>.<host>.<user>.log.<LEVEL>.<YYYYMMDD-HHMMSS>.<pid>[.gz]`.
//! Fields are addressed from the end of the name because the program part may
//! itself contain dots.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use crate::error::ParseError;
use crate::record::{Compression, LogLevel, LogRecord};

/// Minimum number of dot-separated fields once the suffix is stripped.
pub const MIN_FIELDS: usize = 7;

/// Literal field that separates the identity part from the level part.
pub const LOG_MARKER: &str = "log";

/// `chrono` format of the timestamp field.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

const TIMESTAMP_LEN: usize = 15;

/// Parses the base name of `path` into a [`LogRecord`].
///
/// # Errors
///
/// - [`ParseError::NotALogFile`] if the name has too few fields, lacks the
///   `log` marker, or is not valid UTF-8.
/// - [`ParseError::InvalidTimestamp`] if the timestamp field is malformed.
/// - [`ParseError::UnsupportedLevel`] if the level field is unknown.
pub fn parse(path: impl AsRef<Path>) -> Result<LogRecord, ParseError> {
    let path = path.as_ref();
    let basename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or(ParseError::NotALogFile)?;

    let mut fields: Vec<&str> = basename.split('.').collect();

    let extension = fields.last().and_then(|last| Compression::from_suffix(last));
    if extension.is_some() {
        fields.pop();
    }

    let n = fields.len();
    if n < MIN_FIELDS {
        return Err(ParseError::NotALogFile);
    }
    if fields[n - 4] != LOG_MARKER {
        return Err(ParseError::NotALogFile);
    }

    let pid_field = fields[n - 1];
    let pid = pid_field.parse::<u64>().unwrap_or_else(|e| {
        warn!(pid = pid_field, file = %path.display(), error = %e, "invalid pid in log filename");
        0
    });

    let timestamp = parse_timestamp(fields[n - 2])?;
    let level: LogLevel = fields[n - 3].parse()?;

    Ok(LogRecord {
        filename: path.to_path_buf(),
        program: fields[..n - 6].join("."),
        host: fields[n - 6].to_string(),
        username: fields[n - 5].to_string(),
        level,
        timestamp,
        pid,
        extension,
    })
}

/// Parses a `YYYYMMDD-HHMMSS` token as a UTC timestamp.
///
/// The shape is checked before handing the token to chrono, which would
/// otherwise accept unpadded or signed numbers.
///
/// # Errors
///
/// Returns [`ParseError::InvalidTimestamp`] if the token is malformed or not
/// a real calendar time.
pub fn parse_timestamp(token: &str) -> Result<DateTime<Utc>, ParseError> {
    let invalid = || ParseError::InvalidTimestamp(token.to_string());

    let well_formed = token.len() == TIMESTAMP_LEN
        && token.bytes().enumerate().all(|(i, b)| {
            if i == 8 {
                b == b'-'
            } else {
                b.is_ascii_digit()
            }
        });
    if !well_formed {
        return Err(invalid());
    }

    // chrono reads second 60 as a leap second; filenames never carry one.
    if &token[13..] > "59" {
        return Err(invalid());
    }

    NaiveDateTime::parse_from_str(token, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| invalid())
}

/// Formats a timestamp the way it appears in filenames.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
