//! # lockscanlib
//!
//! Workspace-aware lock file discovery for JavaScript source trees.
//!
//! ## Overview
//!
//! Every `package.json` in a repository should be governed by a lock file.
//! In a monorepo that lock file usually lives at the workspace root, not
//! next to each member package, so a plain "is there a lock file here?"
//! check reports false negatives. This library walks a tree and, for each
//! manifest, works out which lock file(s) actually apply:
//!
//! - **Local lock files**: a package with its own lock file uses it
//! - **Workspace members**: a package matched by an enclosing workspace's
//!   globs inherits the lock files of its closest ancestor that has any
//! - **Everything else**: reported with no lock file
//!
//! ## Features
//!
//! - **npm, yarn, pnpm and bun**: `package-lock.json`, `yarn.lock`,
//!   `pnpm-lock.yaml` and `bun.lockb`
//! - **Both workspace declarations**: `package.json` `workspaces` and
//!   `pnpm-workspace.yaml`, including `!` exclusions
//! - **Pluggable filesystem**: scan the disk or an in-memory tree
//! - **Validation report**: JSON summary of packages with and without locks
//!
//! ## Example
//!
//! ```rust
//! use lockscanlib::{scan, ValidationReport};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("package.json"), r#"{"workspaces": ["packages/*"]}"#).unwrap();
//! fs::write(dir.path().join("yarn.lock"), "").unwrap();
//! fs::create_dir_all(dir.path().join("packages/app")).unwrap();
//! fs::write(dir.path().join("packages/app/package.json"), "{}").unwrap();
//!
//! let records = scan(dir.path()).unwrap();
//! assert_eq!(records[1].package_json_path, "packages/app/package.json");
//! assert_eq!(records[1].lock_file_paths, vec!["yarn.lock"]);
//!
//! let report = ValidationReport::from_records(records);
//! assert!(report.succeeded);
//! ```

pub mod ancestors;
pub mod error;
pub mod fs;
pub mod matcher;
pub mod options;
pub mod report;
pub mod scanner;
pub mod workspace;

pub use ancestors::{find_in_ancestors, LockFileMatch};
pub use error::LockscanError;
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use matcher::{matches, PatternSet};
pub use options::ScanOptions;
pub use report::{ValidationReport, LOCK_FILES_REPORT_FILENAME};
pub use scanner::{discover_lock_files, scan, PackageRecord};
pub use workspace::{read_workspace_patterns, WorkspaceInfo};

/// Result type for lockscanlib operations
pub type Result<T> = std::result::Result<T, LockscanError>;
