//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`run`] - Retention pass that deletes files
//! - [`plan`] - Retention pass that only reports
//! - [`parse`] - File name inspection
//! - [`init_config`] - Sample configuration

pub mod init_config;
pub mod parse;
pub mod plan;
pub mod run;

pub use init_config::InitConfigCommand;
pub use parse::ParseCommand;
pub use plan::PlanCommand;
pub use run::RunCommand;

use std::path::Path;

use lgexpire::ExpireConfig;

use crate::cli::SelectionArgs;
use crate::error::CliError;

/// Builds the pass configuration from the config file and command-line flags.
///
/// Flags win over the file: a directory, program list or rule list given on
/// the command line replaces the file's value. The result is validated.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the merged configuration
/// is invalid.
pub fn resolve_config(config: Option<&Path>, args: &SelectionArgs) -> Result<ExpireConfig, CliError> {
    let mut resolved = match config {
        Some(path) => ExpireConfig::read_file(path)?,
        None => ExpireConfig::default(),
    };

    if let Some(dir) = &args.dir {
        resolved.log_dir = Some(dir.clone());
    }
    if !args.programs.is_empty() {
        resolved.programs.clone_from(&args.programs);
    }
    if !args.rules.is_empty() {
        resolved.rules.clone_from(&args.rules);
    }

    resolved.validate()?;
    Ok(resolved)
}
