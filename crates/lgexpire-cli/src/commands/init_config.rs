//! Sample configuration.

use std::io::Write;
use std::path::Path;

use lgexpire::ExpireConfig;
use tracing::info;

use crate::error::CliError;

/// Init-config command executor.
#[derive(Debug, Default)]
pub struct InitConfigCommand {
    force: bool,
}

impl InitConfigCommand {
    /// Create a new init-config command.
    #[must_use]
    pub const fn new(force: bool) -> Self {
        Self { force }
    }

    /// Write the sample configuration to `output`, or to `writer` if no path
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists and `force` is not set, or if
    /// writing fails.
    pub fn execute<W: Write>(&self, writer: &mut W, output: Option<&Path>) -> Result<(), CliError> {
        let json = ExpireConfig::sample().to_json()?;

        match output {
            Some(path) => {
                if path.exists() && !self.force {
                    return Err(CliError::AlreadyExists(path.to_path_buf()));
                }
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, format!("{json}\n"))?;
                info!(path = %path.display(), "wrote sample configuration");
            }
            None => writeln!(writer, "{json}")?,
        }
        Ok(())
    }
}
