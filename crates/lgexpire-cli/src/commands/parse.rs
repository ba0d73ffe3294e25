//! File name inspection.

use std::io::Write;
use std::path::PathBuf;

use crate::error::CliError;
use crate::output::{OutputFormat, ParsedName, ParsedNames};

/// Parse command executor.
#[derive(Debug, Default)]
pub struct ParseCommand;

impl ParseCommand {
    /// Create a new parse command.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse every name and print the metadata or the rejection reason.
    ///
    /// Rejected names are part of the output, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat, files: &[PathBuf]) -> Result<(), CliError> {
        let names = ParsedNames {
            names: files.iter().map(|f| ParsedName::parse(f)).collect(),
        };
        format.write(writer, &names)
    }
}
