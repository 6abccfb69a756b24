//! Workspace-aware lock file discovery.
//!
//! The scanner walks a tree depth-first in pre-order and emits one
//! [`PackageRecord`] per directory holding a manifest. A directory with a
//! manifest, a lock file and member globs becomes a workspace root; packages
//! below it that match its globs but carry no lock file of their own inherit
//! the lock files of their closest ancestor that has some.
//!
//! Pre-order matters: a workspace root is always registered before any of
//! its descendants is classified.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ancestors::find_in_ancestors;
use crate::error::LockscanError;
use crate::fs::{to_slash_path, FileSystem, OsFileSystem};
use crate::options::ScanOptions;
use crate::workspace::{read_workspace_patterns, WorkspaceInfo};
use crate::Result;

/// Lock files governing one package manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    /// Manifest path relative to the scan root
    pub package_json_path: String,
    /// Lock file paths relative to the scan root
    pub lock_file_paths: Vec<String>,
    /// Whether the package is a member of an enclosing workspace
    pub workspace_package: bool,
}

impl PackageRecord {
    pub fn has_lock_file(&self) -> bool {
        !self.lock_file_paths.is_empty()
    }
}

/// Workspace registry and results of a single scan.
struct ScanState<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
    options: &'a ScanOptions,
    workspaces: Vec<WorkspaceInfo>,
    records: Vec<PackageRecord>,
}

impl<'a> ScanState<'a> {
    fn new(fs: &'a dyn FileSystem, root: &'a Path, options: &'a ScanOptions) -> Self {
        Self {
            fs,
            root,
            options,
            workspaces: Vec::new(),
            records: Vec::new(),
        }
    }

    fn relative(&self, path: &Path) -> String {
        to_slash_path(path.strip_prefix(self.root).unwrap_or(path))
    }

    fn visit(&mut self, dir: &Path, entries: &[String]) {
        let has_manifest = entries.iter().any(|e| *e == self.options.manifest);
        let local_locks: Vec<String> = self
            .options
            .lock_files_in(entries)
            .into_iter()
            .map(str::to_string)
            .collect();

        if has_manifest && !local_locks.is_empty() {
            if let Some(patterns) = read_workspace_patterns(self.fs, dir, entries, self.options) {
                let workspace = WorkspaceInfo::new(dir, patterns);
                tracing::debug!(
                    "registered workspace root {} with {} member pattern(s)",
                    workspace.root.display(),
                    workspace.patterns.len()
                );
                self.workspaces.push(workspace);
            }
        }

        if has_manifest {
            self.record_package(dir, &local_locks);
        }

        for entry in entries {
            if self.options.should_skip(entry) {
                continue;
            }

            let path = dir.join(entry);
            if !self.fs.is_dir(&path) {
                continue;
            }

            match self.fs.read_dir(&path) {
                Ok(children) => self.visit(&path, &children),
                Err(err) => {
                    tracing::warn!("skipping unreadable directory {}: {}", path.display(), err);
                }
            }
        }
    }

    fn record_package(&mut self, dir: &Path, local_locks: &[String]) {
        let manifest = dir.join(&self.options.manifest);
        let is_member = self
            .workspaces
            .iter()
            .any(|ws| ws.contains_manifest(&manifest));

        let lock_paths: Vec<PathBuf> = if !local_locks.is_empty() {
            local_locks.iter().map(|name| dir.join(name)).collect()
        } else if is_member {
            find_in_ancestors(self.fs, dir, self.root, self.options).paths
        } else {
            Vec::new()
        };

        let record = PackageRecord {
            package_json_path: self.relative(&manifest),
            lock_file_paths: lock_paths.iter().map(|p| self.relative(p)).collect(),
            workspace_package: is_member,
        };
        tracing::debug!(
            "{}: {:?}{}",
            record.package_json_path,
            record.lock_file_paths,
            if is_member { " (workspace)" } else { "" }
        );

        self.records.push(record);
    }
}

/// Discover the lock files governing every manifest under `root`.
///
/// Records come back in pre-order, siblings in listing order. Unreadable
/// subdirectories and malformed manifests are logged and skipped; only a
/// missing or unlistable `root` is an error.
///
/// # Example
///
/// ```rust
/// use lockscanlib::{discover_lock_files, MemoryFileSystem, ScanOptions};
///
/// let fs = MemoryFileSystem::new()
///     .dir("/repo", &["package.json", "yarn.lock", "packages"])
///     .file("/repo/package.json", r#"{"workspaces": ["packages/*"]}"#)
///     .dir("/repo/packages", &["app1"])
///     .dir("/repo/packages/app1", &["package.json"]);
///
/// let records = discover_lock_files("/repo", &fs, &ScanOptions::new()).unwrap();
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].package_json_path, "packages/app1/package.json");
/// assert_eq!(records[1].lock_file_paths, vec!["yarn.lock"]);
/// assert!(records[1].workspace_package);
/// ```
pub fn discover_lock_files(
    root: impl AsRef<Path>,
    fs: &dyn FileSystem,
    options: &ScanOptions,
) -> Result<Vec<PackageRecord>> {
    let root = root.as_ref();

    if !fs.exists(root) {
        return Err(LockscanError::PathNotFound(root.to_path_buf()));
    }

    let entries = fs
        .read_dir(root)
        .map_err(|source| LockscanError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

    let mut state = ScanState::new(fs, root, options);
    state.visit(root, &entries);

    tracing::debug!(
        "scanned {}: {} package(s), {} workspace root(s)",
        root.display(),
        state.records.len(),
        state.workspaces.len()
    );

    Ok(state.records)
}

/// Scan a directory on disk with the default options.
pub fn scan(root: impl AsRef<Path>) -> Result<Vec<PackageRecord>> {
    discover_lock_files(root, &OsFileSystem::new(), &ScanOptions::default())
}
