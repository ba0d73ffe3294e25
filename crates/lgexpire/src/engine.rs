//! Retention rule evaluation.
//!
//! This module provides:
//! - [`ProgramLogs`] — One program's records bucketed by level, newest first
//! - [`RetentionEngine`] — Applies an ordered list of rules to a program
//! - [`evaluate`] — The evaluation algorithm as a free function
//!
//! Rules never add a file back once another rule condemned it: the delete-set
//! only grows, so a file survives only if every rule applying to its level
//! keeps it. A rule whose age limit would drop every file of a level keeps
//! that level's newest file instead. The floor is applied per rule and per
//! level, not once after all rules ran.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::trace;

use crate::order::{newest, sort_newest_first};
use crate::record::{LogLevel, LogRecord};
use crate::rule::RetentionRule;

/// Files selected for deletion.
pub type DeleteSet = BTreeSet<PathBuf>;

/// The records of one program, bucketed by level and sorted newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramLogs {
    program: String,
    buckets: BTreeMap<LogLevel, Vec<LogRecord>>,
}

impl ProgramLogs {
    /// Collects the records that belong to `program`; the rest are ignored.
    #[must_use]
    pub fn collect<'a>(program: &str, records: impl IntoIterator<Item = &'a LogRecord>) -> Self {
        let mut buckets: BTreeMap<LogLevel, Vec<LogRecord>> =
            LogLevel::ALL.into_iter().map(|level| (level, Vec::new())).collect();

        for record in records.into_iter().filter(|r| r.program == program) {
            buckets.entry(record.level).or_default().push(record.clone());
        }
        for bucket in buckets.values_mut() {
            sort_newest_first(bucket);
        }

        Self {
            program: program.to_string(),
            buckets,
        }
    }

    /// Program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Records of `level`, newest first.
    #[must_use]
    pub fn level(&self, level: LogLevel) -> &[LogRecord] {
        self.buckets.get(&level).map_or(&[], Vec::as_slice)
    }

    /// Total number of records across all levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Returns true if the program has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every record, level by level.
    pub fn records(&self) -> impl Iterator<Item = &LogRecord> {
        self.buckets.values().flatten()
    }
}

/// Applies retention rules to the logs of a program.
#[derive(Debug, Clone, Default)]
pub struct RetentionEngine {
    rules: Vec<RetentionRule>,
}

impl RetentionEngine {
    /// Creates an engine that applies `rules` in order.
    #[must_use]
    pub fn new(rules: Vec<RetentionRule>) -> Self {
        Self { rules }
    }

    /// The configured rules.
    #[must_use]
    pub fn rules(&self) -> &[RetentionRule] {
        &self.rules
    }

    /// Files of `program` to delete, evaluated against the current time.
    #[must_use]
    pub fn evaluate(&self, program: &str, records: &[LogRecord]) -> DeleteSet {
        self.evaluate_at(program, records, Utc::now())
    }

    /// Files of `program` to delete, evaluated against `now`.
    #[must_use]
    pub fn evaluate_at(&self, program: &str, records: &[LogRecord], now: DateTime<Utc>) -> DeleteSet {
        evaluate(program, records, &self.rules, now)
    }

    /// Evaluates an already grouped program.
    #[must_use]
    pub fn evaluate_logs(&self, logs: &ProgramLogs, now: DateTime<Utc>) -> DeleteSet {
        evaluate_logs(logs, &self.rules, now)
    }
}

/// Returns the files of `program` that `rules` do not all keep.
///
/// Records of other programs are ignored and never appear in the result.
#[must_use]
pub fn evaluate(
    program: &str,
    records: &[LogRecord],
    rules: &[RetentionRule],
    now: DateTime<Utc>,
) -> DeleteSet {
    let logs = ProgramLogs::collect(program, records);
    evaluate_logs(&logs, rules, now)
}

/// Same as [`evaluate`] over a prepared [`ProgramLogs`].
#[must_use]
pub fn evaluate_logs(logs: &ProgramLogs, rules: &[RetentionRule], now: DateTime<Utc>) -> DeleteSet {
    let mut delete = DeleteSet::new();

    for rule in rules {
        for level in rule.applicable_levels() {
            let bucket = logs.level(level);
            if bucket.is_empty() {
                continue;
            }

            let kept = kept_by_rule(bucket, rule, now);
            let before = delete.len();
            delete.extend(
                bucket
                    .iter()
                    .filter(|r| !kept.contains(r.filename.as_path()))
                    .map(|r| r.filename.clone()),
            );
            trace!(
                program = logs.program(),
                %level,
                %rule,
                kept = kept.len(),
                newly_condemned = delete.len() - before,
                "applied retention rule"
            );
        }
    }

    delete
}

/// Files of one newest-first bucket that a single rule keeps.
fn kept_by_rule<'a>(bucket: &'a [LogRecord], rule: &RetentionRule, now: DateTime<Utc>) -> HashSet<&'a Path> {
    let mut kept: &[LogRecord] = bucket;
    if let Some(max_count) = rule.count_limit() {
        kept = &kept[..kept.len().min(max_count)];
    }

    let Some(max_age) = rule.age_limit() else {
        return kept.iter().map(|r| r.filename.as_path()).collect();
    };

    let young: HashSet<&Path> = kept
        .iter()
        .filter(|r| is_younger_than(r, max_age, now))
        .map(|r| r.filename.as_path())
        .collect();

    if young.is_empty() {
        // Never let one rule wipe out a level: keep its newest file.
        newest(kept).map(|r| r.filename.as_path()).into_iter().collect()
    } else {
        young
    }
}

/// `timestamp + max_age` is strictly after `now`. Ages beyond the
/// representable range never expire.
fn is_younger_than(record: &LogRecord, max_age: Duration, now: DateTime<Utc>) -> bool {
    TimeDelta::from_std(max_age)
        .ok()
        .and_then(|age| record.timestamp.checked_add_signed(age))
        .is_none_or(|expires| expires > now)
}
