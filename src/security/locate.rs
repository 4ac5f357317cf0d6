//! Locating the security configuration file inside a runtime installation.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find the first file named `file_name` at most `max_depth` levels below
/// `root`.
///
/// Entries are visited in file-name order so the result is stable across
/// runs. A symlink matches when its target is a file; links are not followed
/// while walking. Unreadable subdirectories are skipped; a missing or
/// non-directory `root` is an error.
pub fn find_security_file(
    root: &Path,
    file_name: &str,
    max_depth: usize,
) -> io::Result<Option<PathBuf>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", root.display()),
        ));
    }

    let found = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .find(|entry| entry.file_name() == file_name && entry.path().is_file())
        .map(|entry| entry.into_path());

    Ok(found)
}
