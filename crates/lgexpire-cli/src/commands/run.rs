//! Retention pass that deletes files.

use std::io::Write;
use std::path::Path;

use lgexpire::Expire;
use tracing::debug;

use crate::cli::RunArgs;
use crate::commands::resolve_config;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Run command executor.
pub struct RunCommand<'a> {
    config: Option<&'a Path>,
}

impl<'a> RunCommand<'a> {
    /// Create a new run command reading the optional config file.
    #[must_use]
    pub const fn new(config: Option<&'a Path>) -> Self {
        Self { config }
    }

    /// Execute the run command.
    ///
    /// The report is written even when some files could not be removed; the
    /// failures are then returned as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the pass fails, a
    /// file could not be removed or output fails.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat, args: &RunArgs) -> Result<(), CliError> {
        let mut config = resolve_config(self.config, &args.selection)?;
        if args.dry_run {
            config.dry_run = true;
        }
        debug!(?config, "starting retention pass");

        let report = Expire::new(config).run()?;
        format.write(writer, &report)?;
        report.into_result()?;
        Ok(())
    }
}
