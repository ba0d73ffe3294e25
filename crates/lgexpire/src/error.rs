//! Error types for filename parsing and retention runs.

use std::path::PathBuf;

use thiserror::Error;

/// Why a filename was not accepted as a managed log file.
///
/// Every variant is expected during a normal run (unrelated files share the
/// log directory) and is filtered out rather than reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The name does not have the `<program>.<host>.<user>.log.<LEVEL>.<time>.<pid>` shape.
    #[error("not a log file name")]
    NotALogFile,

    /// The timestamp field is not `YYYYMMDD-HHMMSS`.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// The level field is not one of INFO, WARNING, ERROR, FATAL.
    #[error("{0} is not a supported log level")]
    UnsupportedLevel(String),
}

/// A single file that could not be removed.
#[derive(Debug, Error)]
#[error("failed to remove {}: {source}", .path.display())]
pub struct DeletionFailure {
    /// File that was selected for deletion.
    pub path: PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: std::io::Error,
}

/// Run-level errors reported to the caller.
#[derive(Debug, Error)]
pub enum ExpireError {
    /// No programs were configured.
    #[error("programs is empty")]
    NoPrograms,

    /// The log directory contained no entries at all.
    #[error("no files found in {}", .dir.display())]
    NoFilesFound {
        /// Directory that was listed.
        dir: PathBuf,
    },

    /// The log directory could not be listed.
    #[error("failed to read directory {}: {source}", .dir.display())]
    ReadDir {
        /// Directory that was listed.
        dir: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::ExpireConfig`].
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A retention rule could not be parsed or names an unknown level.
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    /// One or more files selected for deletion could not be removed.
    #[error("{} file(s) could not be removed: {}", .0.len(), join_failures(.0))]
    Deletions(Vec<DeletionFailure>),
}

fn join_failures(failures: &[DeletionFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for runner operations.
pub type Result<T> = std::result::Result<T, ExpireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_messages() {
        assert_eq!(ParseError::NotALogFile.to_string(), "not a log file name");
        assert_eq!(
            ParseError::InvalidTimestamp("2016-05-22".to_string()).to_string(),
            "invalid timestamp: 2016-05-22"
        );
        assert_eq!(
            ParseError::UnsupportedLevel("INFA".to_string()).to_string(),
            "INFA is not a supported log level"
        );
    }

    #[test]
    fn expire_error_display_messages() {
        assert_eq!(ExpireError::NoPrograms.to_string(), "programs is empty");

        let err = ExpireError::NoFilesFound {
            dir: PathBuf::from("/var/log/app"),
        };
        assert_eq!(err.to_string(), "no files found in /var/log/app");

        let err = ExpireError::InvalidRule("unknown key 'size'".to_string());
        assert_eq!(err.to_string(), "invalid rule: unknown key 'size'");
    }

    #[test]
    fn deletions_lists_every_failure() {
        let err = ExpireError::Deletions(vec![
            DeletionFailure {
                path: PathBuf::from("/tmp/a"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            },
            DeletionFailure {
                path: PathBuf::from("/tmp/b"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            },
        ]);

        let msg = err.to_string();
        assert!(msg.starts_with("2 file(s) could not be removed"));
        assert!(msg.contains("failed to remove /tmp/a: gone"));
        assert!(msg.contains("failed to remove /tmp/b: denied"));
    }

    #[test]
    fn config_parse_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let err: ExpireError = json_err.into();
        assert!(err.to_string().starts_with("invalid config"));
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParseError>();
        assert_send_sync::<ExpireError>();
    }
}
