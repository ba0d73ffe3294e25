//! Runner configuration.
//!
//! Configuration is a JSON document:
//!
//! ```json
//! {
//!   "log_dir": "/var/log/myapp",
//!   "programs": ["myapp"],
//!   "rules": [
//!     { "max_count": 30, "max_age": "30days" },
//!     { "level": "INFO", "max_count": 5 }
//!   ],
//!   "dry_run": false
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExpireError, Result};
use crate::rule::RetentionRule;

/// Settings for one retention pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpireConfig {
    /// Directory holding the log files; the system temp directory if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Programs whose logs are expired. Must not be empty.
    #[serde(default)]
    pub programs: Vec<String>,

    /// Rules applied to every program, in order. No rules means nothing is
    /// deleted; [`ExpireConfig::sample`] starts from the default policy.
    #[serde(default)]
    pub rules: Vec<RetentionRule>,

    /// Report what would be removed without removing anything.
    #[serde(default)]
    pub dry_run: bool,
}

impl ExpireConfig {
    /// Creates a config for the given programs with no rules.
    #[must_use]
    pub fn new<I, S>(programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            programs: programs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the log directory.
    #[must_use]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Appends a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: RetentionRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Loads and validates a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file without validating it, so callers can
    /// fill in missing fields first.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ExpireError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(config = %path.display(), "loaded config file");
        Ok(serde_json::from_str(&content)?)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that programs are named and every rule names a known level.
    pub fn validate(&self) -> Result<()> {
        if self.programs.is_empty() {
            return Err(ExpireError::NoPrograms);
        }
        if self.programs.iter().any(String::is_empty) {
            return Err(ExpireError::Config("program names cannot be empty".to_string()));
        }
        for rule in &self.rules {
            rule.validate()?;
        }
        Ok(())
    }

    /// The directory to scan.
    ///
    /// Falls back to [`std::env::temp_dir`] when unset, which is `/tmp` on
    /// Unix and where glog writes its files by default.
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// A starting point for a configuration file.
    #[must_use]
    pub fn sample() -> Self {
        Self::new(["myapp"])
            .with_log_dir("/var/log/myapp")
            .with_rule(RetentionRule::default_policy())
            .with_rule(RetentionRule::new().with_level("INFO").with_max_count(10))
    }

    /// Serializes the configuration as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
