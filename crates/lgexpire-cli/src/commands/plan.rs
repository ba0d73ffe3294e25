//! Retention pass that only reports.

use std::io::Write;
use std::path::Path;

use lgexpire::Expire;

use crate::cli::SelectionArgs;
use crate::commands::resolve_config;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Plan command executor.
pub struct PlanCommand<'a> {
    config: Option<&'a Path>,
}

impl<'a> PlanCommand<'a> {
    /// Create a new plan command reading the optional config file.
    #[must_use]
    pub const fn new(config: Option<&'a Path>) -> Self {
        Self { config }
    }

    /// Execute the plan command. Nothing is removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the directory cannot
    /// be read or output fails.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat, args: &SelectionArgs) -> Result<(), CliError> {
        let config = resolve_config(self.config, args)?;
        let report = Expire::new(config).plan()?;
        format.write(writer, &report)
    }
}
