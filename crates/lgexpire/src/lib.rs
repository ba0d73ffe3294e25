//! # lgexpire
//!
//! Retention for rotated glog-style log files.
//!
//! Files named `<program>.<host>.<user>.log.<LEVEL>.<YYYYMMDD-HHMMSS>.<pid>[.gz]`
//! are grouped by program and level, then trimmed by retention rules that
//! bound how many files are kept and how old they may get.
//!
//! This crate provides:
//!
//! - [`LogRecord`] — Metadata parsed from a log filename
//! - [`parser::parse`] — The filename parser
//! - [`RetentionRule`] — Count and age limits, optionally per level
//! - [`RetentionEngine`] — Decides which files of a program to delete
//! - [`Expire`] — Runs a pass over a directory and removes the files
//! - [`ExpireConfig`] — JSON configuration for [`Expire`]
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use lgexpire::{LogRecord, RetentionEngine, RetentionRule};
//!
//! let records: Vec<LogRecord> = [
//!     "app.host.user.log.INFO.20160101-000000.1",
//!     "app.host.user.log.INFO.20160102-000000.2",
//!     "app.host.user.log.INFO.20160103-000000.3",
//!     "notes.txt",
//! ]
//! .iter()
//! .filter_map(|name| LogRecord::parse(name).ok())
//! .collect();
//!
//! let engine = RetentionEngine::new(vec![RetentionRule::new().with_max_count(2)]);
//! let now = Utc.with_ymd_and_hms(2016, 2, 1, 0, 0, 0).unwrap();
//! let delete = engine.evaluate_at("app", &records, now);
//!
//! assert_eq!(delete.len(), 1);
//! assert!(delete.iter().all(|p| p.ends_with("app.host.user.log.INFO.20160101-000000.1")));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod expire;
pub mod order;
pub mod parser;
pub mod record;
pub mod remover;
pub mod rule;
pub mod source;

// Re-export main types
pub use config::ExpireConfig;
pub use engine::{evaluate, DeleteSet, ProgramLogs, RetentionEngine};
pub use error::{DeletionFailure, ExpireError, ParseError, Result};
pub use expire::{parse_entries, Expire, ProgramReport, RunReport};
pub use record::{Compression, LogLevel, LogRecord};
pub use remover::{DryRunRemover, FileRemover, FsRemover};
pub use rule::RetentionRule;
pub use source::list_dir;
