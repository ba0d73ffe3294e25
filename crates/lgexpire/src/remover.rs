//! File removal capability.
//!
//! The runner never calls the filesystem directly; it removes files through a
//! [`FileRemover`] so dry runs and tests can substitute their own.

use std::io;
use std::path::Path;

use tracing::info;

/// Removes a single file.
pub trait FileRemover: Send + Sync {
    /// Removes `path`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the failed removal.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Deletes files from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl FileRemover for FsRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Logs what would be removed and leaves the file in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRemover;

impl FileRemover for DryRunRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        info!(file = %path.display(), "dry run: would remove");
        Ok(())
    }
}
