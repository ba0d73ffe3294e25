//! Directory enumeration.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExpireError, Result};

/// Lists every entry of `dir`, non-recursively, sorted by path.
///
/// Entries are returned whether or not they look like log files; filtering is
/// the parser's job.
pub fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |source| ExpireError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_err)?;
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_all_entries_sorted() {
        let dir = TempDir::new().expect("create temp dir");
        for name in ["b.log", "a.INFO", "c"] {
            fs::write(dir.path().join(name), "content").expect("write file");
        }
        fs::create_dir(dir.path().join("sub")).expect("create subdir");

        let entries = list_dir(dir.path()).expect("list dir");
        let names: Vec<String> = entries
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.INFO", "b.log", "c", "sub"]);
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let dir = TempDir::new().expect("create temp dir");
        assert!(list_dir(dir.path()).expect("list dir").is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().expect("create temp dir");
        let missing = dir.path().join("nope");
        let result = list_dir(&missing);
        assert!(matches!(result, Err(ExpireError::ReadDir { .. })));
    }
}
