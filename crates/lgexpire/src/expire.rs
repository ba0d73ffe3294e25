//! Retention passes over a log directory.
//!
//! [`Expire`] ties the pieces together: list the directory, parse every entry,
//! evaluate the rules for each configured program and remove the condemned
//! files. A failed removal is recorded and the pass moves on.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ExpireConfig;
use crate::engine::{ProgramLogs, RetentionEngine};
use crate::error::{DeletionFailure, ExpireError, Result};
use crate::parser;
use crate::record::LogRecord;
use crate::remover::{DryRunRemover, FileRemover, FsRemover};
use crate::source::list_dir;

/// Outcome for one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramReport {
    /// Program name.
    pub program: String,
    /// Number of log files that belong to the program.
    pub matched: usize,
    /// Files selected for deletion, sorted.
    pub deleted: Vec<PathBuf>,
}

impl ProgramReport {
    /// Number of files kept.
    #[must_use]
    pub fn kept(&self) -> usize {
        self.matched - self.deleted.len()
    }
}

/// Outcome of a full pass.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    /// When the rules were evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluated_at: Option<DateTime<Utc>>,
    /// Whether removals were only simulated.
    pub dry_run: bool,
    /// Per-program results, in configuration order.
    pub programs: Vec<ProgramReport>,
    /// Files that could not be removed.
    #[serde(serialize_with = "serialize_failures")]
    pub failures: Vec<DeletionFailure>,
}

impl RunReport {
    /// Total number of files selected for deletion.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.programs.iter().map(|p| p.deleted.len()).sum()
    }

    /// Returns true if every removal succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Converts collected deletion failures into an error.
    pub fn into_result(self) -> Result<Self> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(ExpireError::Deletions(self.failures))
        }
    }
}

fn serialize_failures<S>(failures: &[DeletionFailure], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(failures.iter().map(ToString::to_string))
}

/// Runs retention passes for a configuration.
pub struct Expire {
    config: ExpireConfig,
    remover: Box<dyn FileRemover>,
}

impl std::fmt::Debug for Expire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expire").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Expire {
    /// Creates a runner. Files are removed from disk unless the configuration
    /// asks for a dry run.
    #[must_use]
    pub fn new(config: ExpireConfig) -> Self {
        let remover: Box<dyn FileRemover> = if config.dry_run {
            Box::new(DryRunRemover)
        } else {
            Box::new(FsRemover)
        };
        Self { config, remover }
    }

    /// Replaces the removal capability.
    #[must_use]
    pub fn with_remover(mut self, remover: Box<dyn FileRemover>) -> Self {
        self.remover = remover;
        self
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &ExpireConfig {
        &self.config
    }

    /// Runs one pass over the configured directory at the current time.
    pub fn run(&self) -> Result<RunReport> {
        self.run_at(Utc::now())
    }

    /// Runs one pass over the configured directory, evaluating ages at `now`.
    ///
    /// # Errors
    ///
    /// - [`ExpireError::NoPrograms`] if no program is configured.
    /// - [`ExpireError::ReadDir`] if the directory cannot be listed.
    /// - [`ExpireError::NoFilesFound`] if the directory is empty.
    ///
    /// Removal failures do not fail the pass; they are in
    /// [`RunReport::failures`].
    pub fn run_at(&self, now: DateTime<Utc>) -> Result<RunReport> {
        let entries = self.list_entries()?;
        self.run_entries_at(&entries, now)
    }

    /// Evaluates the configured directory at the current time without
    /// removing anything.
    pub fn plan(&self) -> Result<RunReport> {
        self.plan_at(Utc::now())
    }

    /// Evaluates the configured directory without removing anything.
    pub fn plan_at(&self, now: DateTime<Utc>) -> Result<RunReport> {
        let entries = self.list_entries()?;
        self.plan_entries_at(&entries, now)
    }

    /// Runs a pass over an already enumerated list of paths.
    ///
    /// # Errors
    ///
    /// [`ExpireError::NoPrograms`] or, for an empty list,
    /// [`ExpireError::NoFilesFound`] naming the configured directory.
    pub fn run_entries_at(&self, entries: &[PathBuf], now: DateTime<Utc>) -> Result<RunReport> {
        self.pass(entries, now, Some(self.remover.as_ref()))
    }

    /// Evaluates an already enumerated list of paths without removing anything.
    pub fn plan_entries_at(&self, entries: &[PathBuf], now: DateTime<Utc>) -> Result<RunReport> {
        self.pass(entries, now, None)
    }

    fn list_entries(&self) -> Result<Vec<PathBuf>> {
        if self.config.programs.is_empty() {
            return Err(ExpireError::NoPrograms);
        }
        let dir = self.config.log_dir();
        let entries = list_dir(&dir)?;
        debug!(dir = %dir.display(), entries = entries.len(), "listed log directory");
        Ok(entries)
    }

    fn pass(
        &self,
        entries: &[PathBuf],
        now: DateTime<Utc>,
        remover: Option<&dyn FileRemover>,
    ) -> Result<RunReport> {
        if self.config.programs.is_empty() {
            return Err(ExpireError::NoPrograms);
        }
        if entries.is_empty() {
            return Err(ExpireError::NoFilesFound {
                dir: self.config.log_dir(),
            });
        }

        let records = parse_entries(entries);
        let engine = RetentionEngine::new(self.config.rules.clone());

        let mut report = RunReport {
            evaluated_at: Some(now),
            dry_run: remover.is_none() || self.config.dry_run,
            ..RunReport::default()
        };

        for program in &self.config.programs {
            let logs = ProgramLogs::collect(program, &records);
            if logs.is_empty() {
                info!(program = %program, "found no log files");
            }

            let deleted: Vec<PathBuf> = engine.evaluate_logs(&logs, now).into_iter().collect();
            info!(
                program = %program,
                matched = logs.len(),
                deleting = deleted.len(),
                "evaluated retention rules"
            );

            if let Some(remover) = remover {
                report.failures.extend(remove_all(remover, &deleted));
            }

            report.programs.push(ProgramReport {
                program: program.clone(),
                matched: logs.len(),
                deleted,
            });
        }

        Ok(report)
    }
}

/// Parses entries, dropping every path that is not a managed log file.
#[must_use]
pub fn parse_entries(entries: &[PathBuf]) -> Vec<LogRecord> {
    entries
        .iter()
        .filter_map(|path| match parser::parse(path) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(file = %path.display(), reason = %e, "skipping entry");
                None
            }
        })
        .collect()
}

/// Removes every path, collecting failures instead of stopping at the first.
fn remove_all(remover: &dyn FileRemover, paths: &[PathBuf]) -> Vec<DeletionFailure> {
    paths
        .iter()
        .filter_map(|path| remove_one(remover, path).err())
        .collect()
}

fn remove_one(remover: &dyn FileRemover, path: &Path) -> std::result::Result<(), DeletionFailure> {
    remover.remove(path).map_err(|source| {
        warn!(file = %path.display(), error = %source, "failed to remove log file");
        DeletionFailure {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(file = %path.display(), "removed log file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RetentionRule;
    use chrono::TimeZone;
    use std::collections::BTreeSet;
    use std::io;
    use std::sync::Mutex;

    /// Records removals and fails for configured paths.
    #[derive(Default)]
    struct RecordingRemover {
        removed: Mutex<Vec<PathBuf>>,
        fail: BTreeSet<PathBuf>,
    }

    impl RecordingRemover {
        fn failing(paths: &[&str]) -> Self {
            Self {
                removed: Mutex::new(Vec::new()),
                fail: paths.iter().map(PathBuf::from).collect(),
            }
        }

        fn removed(&self) -> Vec<PathBuf> {
            self.removed.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    impl FileRemover for RecordingRemover {
        fn remove(&self, path: &Path) -> io::Result<()> {
            if self.fail.contains(path) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.removed
                .lock()
                .map_err(|_| io::Error::other("mutex poisoned"))?
                .push(path.to_path_buf());
            Ok(())
        }
    }

    impl FileRemover for std::sync::Arc<RecordingRemover> {
        fn remove(&self, path: &Path) -> io::Result<()> {
            self.as_ref().remove(path)
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 6, 1, 0, 0, 0).single().expect("valid date")
    }

    fn entries(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    const NAMES: &[&str] = &[
        "dino-catcher.INFO",
        "dino-catcher.raspberrypi.unknownuser.log.INFO.20160525-075157.734",
        "dino-catcher.raspberrypi.unknownuser.log.INFO.20160525-075741.767",
        "dino-catcher.raspberrypi.unknownuser.log.INFO.20160525-103220.767",
        "dino-catcher.raspberrypi.unknownuser.log.WARNING.20160525-075157.734",
        "dino-catcher.raspberrypi.unknownuser.log.WARNING.20160525-103220.767",
        "disco-central.disco.root.log.ERROR.20160302-004210.28171",
        "disco-central.disco.root.log.ERROR.20160302-004512.28873",
        "README.md",
    ];

    #[test]
    fn removes_condemned_files_per_program() {
        let remover = std::sync::Arc::new(RecordingRemover::default());
        let config = ExpireConfig::new(["dino-catcher"]).with_rule(RetentionRule::new().with_max_count(1));
        let expire = Expire::new(config).with_remover(Box::new(remover.clone()));

        let report = expire.run_entries_at(&entries(NAMES), now()).expect("run");

        assert!(report.is_clean());
        assert_eq!(report.programs.len(), 1);
        assert_eq!(report.programs[0].matched, 5);
        assert_eq!(report.programs[0].kept(), 2);
        assert_eq!(
            remover.removed(),
            entries(&[
                "dino-catcher.raspberrypi.unknownuser.log.INFO.20160525-075157.734",
                "dino-catcher.raspberrypi.unknownuser.log.INFO.20160525-075741.767",
                "dino-catcher.raspberrypi.unknownuser.log.WARNING.20160525-075157.734",
            ])
        );
    }

    #[test]
    fn deletion_failures_are_collected() {
        let remover = std::sync::Arc::new(RecordingRemover::failing(&[
            "dino-catcher.raspberrypi.unknownuser.log.INFO.20160525-075157.734",
        ]));
        let config = ExpireConfig::new(["dino-catcher", "disco-central"])
            .with_rule(RetentionRule::new().with_max_count(1));
        let expire = Expire::new(config).with_remover(Box::new(remover.clone()));

        let report = expire.run_entries_at(&entries(NAMES), now()).expect("run");

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.deleted_count(), 4);
        // The failure did not stop the sibling file or the next program.
        assert_eq!(remover.removed().len(), 3);

        match report.into_result() {
            Err(ExpireError::Deletions(failures)) => assert_eq!(failures.len(), 1),
            other => panic!("expected deletion failures, got {other:?}"),
        }
    }

    #[test]
    fn plan_removes_nothing() {
        let remover = std::sync::Arc::new(RecordingRemover::default());
        let config = ExpireConfig::new(["dino-catcher"]).with_rule(RetentionRule::new().with_max_count(1));
        let expire = Expire::new(config).with_remover(Box::new(remover.clone()));

        let report = expire.plan_entries_at(&entries(NAMES), now()).expect("plan");
        assert!(report.dry_run);
        assert_eq!(report.deleted_count(), 3);
        assert!(remover.removed().is_empty());
    }

    #[test]
    fn program_without_files_is_not_an_error() {
        let config = ExpireConfig::new(["ghost"]).with_rule(RetentionRule::new().with_max_count(1));
        let report = Expire::new(config)
            .run_entries_at(&entries(NAMES), now())
            .expect("run");
        assert_eq!(report.programs[0].matched, 0);
        assert!(report.programs[0].deleted.is_empty());
    }

    #[test]
    fn no_programs_is_an_error() {
        let expire = Expire::new(ExpireConfig::default());
        assert!(matches!(
            expire.run_entries_at(&entries(NAMES), now()),
            Err(ExpireError::NoPrograms)
        ));
        assert!(matches!(expire.run_at(now()), Err(ExpireError::NoPrograms)));
    }

    #[test]
    fn no_rules_deletes_nothing() {
        let names: Vec<String> = (0..40)
            .map(|i| format!("p.host.user.log.INFO.201601{:02}-000000.{i}", i % 28 + 1))
            .collect();
        let remover = std::sync::Arc::new(RecordingRemover::default());
        let expire = Expire::new(ExpireConfig::new(["p"])).with_remover(Box::new(remover.clone()));

        let report = expire
            .run_entries_at(&names.iter().map(PathBuf::from).collect::<Vec<_>>(), now())
            .expect("run");

        assert_eq!(report.programs[0].matched, 40);
        assert_eq!(report.deleted_count(), 0);
        assert!(remover.removed().is_empty());
    }

    #[test]
    fn empty_entry_list_reports_no_files_found() {
        let config = ExpireConfig::new(["p"])
            .with_log_dir("/var/log/p")
            .with_rule(RetentionRule::new().with_max_count(1));
        let expire = Expire::new(config);

        match expire.run_entries_at(&[], now()) {
            Err(ExpireError::NoFilesFound { dir }) => assert_eq!(dir, PathBuf::from("/var/log/p")),
            other => panic!("expected NoFilesFound, got {other:?}"),
        }
        assert!(matches!(
            expire.plan_entries_at(&[], now()),
            Err(ExpireError::NoFilesFound { .. })
        ));
    }

    #[test]
    fn unrelated_files_never_parse() {
        let records = parse_entries(&entries(NAMES));
        assert_eq!(records.len(), 7);
        assert!(records.iter().all(|r| r.filename != Path::new("README.md")));
    }

    #[test]
    fn dry_run_config_uses_dry_run_remover() {
        let config = ExpireConfig::new(["dino-catcher"])
            .with_rule(RetentionRule::new().with_max_count(1))
            .with_dry_run(true);
        // Paths do not exist on disk; a real remover would fail.
        let report = Expire::new(config)
            .run_entries_at(&entries(NAMES), now())
            .expect("run");
        assert!(report.dry_run);
        assert!(report.is_clean());
        assert_eq!(report.deleted_count(), 3);
    }

    #[test]
    fn report_serializes_failures_as_messages() {
        let report = RunReport {
            evaluated_at: None,
            dry_run: false,
            programs: vec![],
            failures: vec![DeletionFailure {
                path: PathBuf::from("/tmp/x"),
                source: io::Error::new(io::ErrorKind::NotFound, "gone"),
            }],
        };
        let json = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(json["failures"][0], "failed to remove /tmp/x: gone");
    }
}
