//! Upward search for the lock file governing a workspace member.

use std::path::{Path, PathBuf};

use crate::fs::FileSystem;
use crate::options::ScanOptions;

/// Lock files found in a single directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockFileMatch {
    /// Lock file names, in listing order
    pub names: Vec<String>,
    /// Absolute paths of the same files
    pub paths: Vec<PathBuf>,
}

impl LockFileMatch {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Find the closest directory at or above `start` holding any lock file.
///
/// The search never leaves `scan_root`: it stops once the next candidate is
/// not `scan_root` or one of its descendants, or at the filesystem root. A
/// directory that cannot be listed counts as having no lock files.
pub fn find_in_ancestors(
    fs: &dyn FileSystem,
    start: &Path,
    scan_root: &Path,
    options: &ScanOptions,
) -> LockFileMatch {
    let mut current = start;

    while current.starts_with(scan_root) {
        match fs.read_dir(current) {
            Ok(entries) => {
                let names: Vec<String> = options
                    .lock_files_in(&entries)
                    .into_iter()
                    .map(str::to_string)
                    .collect();

                if !names.is_empty() {
                    tracing::debug!(
                        "{} inherits lock files {:?} from {}",
                        start.display(),
                        names,
                        current.display()
                    );
                    let paths = names.iter().map(|name| current.join(name)).collect();
                    return LockFileMatch { names, paths };
                }
            }
            Err(err) => {
                tracing::debug!("cannot list {}: {}", current.display(), err);
            }
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    LockFileMatch::default()
}
