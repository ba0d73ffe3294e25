//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use lgexpire::{LogRecord, RunReport};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone, Default)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

impl TableDisplay for RunReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let verb = if self.dry_run { "to delete" } else { "deleted" };

        match self.evaluated_at {
            Some(at) => writeln!(
                writer,
                "Retention pass at {}{}",
                at.to_rfc3339_opts(SecondsFormat::Secs, true),
                if self.dry_run { " (dry run)" } else { "" }
            )?,
            None => writeln!(writer, "Retention pass")?,
        }
        writeln!(writer)?;

        writeln!(
            writer,
            "{:<32}  {:>7}  {:>7}  {:>9}",
            "PROGRAM",
            "MATCHED",
            "KEPT",
            verb.to_uppercase()
        )?;
        writeln!(writer, "{}", "─".repeat(61))?;
        for program in &self.programs {
            writeln!(
                writer,
                "{:<32}  {:>7}  {:>7}  {:>9}",
                truncate(&program.program, 32),
                program.matched,
                program.kept(),
                program.deleted.len()
            )?;
        }

        let deleted: Vec<&PathBuf> = self.programs.iter().flat_map(|p| &p.deleted).collect();
        if !deleted.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Files {verb}:")?;
            for path in deleted {
                writeln!(writer, "  {}", path.display())?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Failures:")?;
            for failure in &self.failures {
                writeln!(writer, "  {failure}")?;
            }
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} file(s) {verb}", self.deleted_count())?;
        Ok(())
    }
}

/// Outcome of parsing one file name.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedName {
    /// The input as given.
    pub file: PathBuf,
    /// Parsed metadata, if the name is a managed log file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<LogRecord>,
    /// Why the name was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedName {
    /// Parses `path` and keeps either the record or the error message.
    #[must_use]
    pub fn parse(path: &Path) -> Self {
        let (record, error) = match LogRecord::parse(path) {
            Ok(record) => (Some(record), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            file: path.to_path_buf(),
            record,
            error,
        }
    }
}

/// Parse results for display.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedNames {
    /// One entry per input, in input order.
    pub names: Vec<ParsedName>,
}

impl TableDisplay for ParsedNames {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            writeln!(writer, "{}", name.file.display())?;
            if let Some(record) = &name.record {
                writeln!(writer, "  Program:    {}", record.program)?;
                writeln!(writer, "  Host:       {}", record.host)?;
                writeln!(writer, "  User:       {}", record.username)?;
                writeln!(writer, "  Level:      {}", record.level)?;
                writeln!(
                    writer,
                    "  Timestamp:  {}",
                    record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
                )?;
                writeln!(writer, "  PID:        {}", record.pid)?;
                if let Some(ext) = record.extension {
                    writeln!(writer, "  Extension:  {ext}")?;
                }
            }
            if let Some(error) = &name.error {
                writeln!(writer, "  Error:      {error}")?;
            }
        }
        Ok(())
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
