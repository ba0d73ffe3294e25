//! Retention rules.
//!
//! A [`RetentionRule`] bounds how many files of a level are kept and how old
//! they may be. Rules are combined by [`crate::engine`]: a file survives only
//! if every rule that applies to its level keeps it.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ExpireError;
use crate::record::LogLevel;

/// Age limit of [`RetentionRule::default_policy`].
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Count limit of [`RetentionRule::default_policy`].
pub const DEFAULT_MAX_COUNT: usize = 30;

/// A single retention rule. All limits that are set apply together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionRule {
    /// Level this rule applies to; unset or empty applies to every level.
    ///
    /// Kept as the raw token: an unknown level makes the rule match nothing
    /// instead of failing the evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Keep files younger than this; unset or zero means no age limit.
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub max_age: Option<Duration>,

    /// Keep at most this many files; unset or zero means no count limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<usize>,
}

impl RetentionRule {
    /// Creates a rule with no limits, which keeps everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The policy used when a configuration names no rules: 30 files, 30 days.
    #[must_use]
    pub fn default_policy() -> Self {
        Self::new()
            .with_max_count(DEFAULT_MAX_COUNT)
            .with_max_age(DEFAULT_MAX_AGE)
    }

    /// Restricts the rule to one level.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Sets the age limit.
    #[must_use]
    pub const fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Sets the count limit.
    #[must_use]
    pub const fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Count limit, with zero normalized to `None`.
    #[must_use]
    pub fn count_limit(&self) -> Option<usize> {
        self.max_count.filter(|&n| n > 0)
    }

    /// Age limit, with zero normalized to `None`.
    #[must_use]
    pub fn age_limit(&self) -> Option<Duration> {
        self.max_age.filter(|d| !d.is_zero())
    }

    /// Returns true if the rule has neither limit and so keeps everything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.count_limit().is_none() && self.age_limit().is_none()
    }

    /// Levels this rule has an opinion on.
    ///
    /// An unrecognized level token yields an empty list.
    #[must_use]
    pub fn applicable_levels(&self) -> Vec<LogLevel> {
        match self.level.as_deref() {
            None | Some("") => LogLevel::ALL.to_vec(),
            Some(token) => token.parse::<LogLevel>().into_iter().collect(),
        }
    }

    /// Rejects a rule whose level token is not a known level.
    ///
    /// The engine tolerates such rules; configuration loading calls this to
    /// fail early instead.
    pub fn validate(&self) -> Result<(), ExpireError> {
        match self.level.as_deref() {
            None | Some("") => Ok(()),
            Some(token) => token
                .parse::<LogLevel>()
                .map(|_| ())
                .map_err(|e| ExpireError::InvalidRule(e.to_string())),
        }
    }
}

impl fmt::Display for RetentionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(level) = self.level.as_deref().filter(|l| !l.is_empty()) {
            parts.push(format!("level={level}"));
        }
        if let Some(count) = self.count_limit() {
            parts.push(format!("count={count}"));
        }
        if let Some(age) = self.age_limit() {
            parts.push(format!("age={}", humantime::format_duration(age)));
        }
        if parts.is_empty() {
            f.write_str("keep-all")
        } else {
            f.write_str(&parts.join(","))
        }
    }
}

impl FromStr for RetentionRule {
    type Err = ExpireError;

    /// Parses `key=value` pairs separated by commas, e.g.
    /// `level=ERROR,count=10,age=30d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rule = Self::new();

        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ExpireError::InvalidRule(format!("expected key=value, got '{pair}'")))?;
            let value = value.trim();

            match key.trim() {
                "level" => rule.level = Some(value.to_string()),
                "count" => {
                    let count = value.parse::<usize>().map_err(|e| {
                        ExpireError::InvalidRule(format!("invalid count '{value}': {e}"))
                    })?;
                    rule.max_count = Some(count);
                }
                "age" => {
                    let age = humantime::parse_duration(value).map_err(|e| {
                        ExpireError::InvalidRule(format!("invalid age '{value}': {e}"))
                    })?;
                    rule.max_age = Some(age);
                }
                other => {
                    return Err(ExpireError::InvalidRule(format!("unknown key '{other}'")));
                }
            }
        }

        rule.validate()?;
        Ok(rule)
    }
}
