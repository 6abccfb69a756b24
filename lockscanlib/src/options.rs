//! Input options for lock file discovery.
//!
//! The defaults describe the JavaScript ecosystem: `package.json` manifests,
//! the npm/yarn/pnpm/bun lock files and the build and VCS directories that
//! never hold first-party packages.

/// Lock files recognized by default, in reporting order.
pub const LOCK_FILES: [&str; 4] = [
    "package-lock.json", // npm
    "yarn.lock",         // yarn
    "pnpm-lock.yaml",    // pnpm
    "bun.lockb",         // bun
];

/// Package manifest file name.
pub const MANIFEST: &str = "package.json";

/// Dedicated workspace manifest file name.
pub const WORKSPACE_MANIFEST: &str = "pnpm-workspace.yaml";

/// Directory names that are never descended into.
pub const SKIP_DIRS: [&str; 8] = [
    "node_modules",
    ".git",
    "dist",
    "build",
    "out",
    "coverage",
    ".next",
    ".turbo",
];

/// Options controlling what the scanner recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Recognized lock file names (exact, case-sensitive)
    pub lock_files: Vec<String>,
    /// Manifest file name marking a package root
    pub manifest: String,
    /// Workspace manifest file name carrying a `packages` list
    pub workspace_manifest: String,
    /// Entry names skipped during traversal
    pub skip_dirs: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            lock_files: LOCK_FILES.iter().map(|s| s.to_string()).collect(),
            manifest: MANIFEST.to_string(),
            workspace_manifest: WORKSPACE_MANIFEST.to_string(),
            skip_dirs: SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also skip directories with this name.
    pub fn skip_dir(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.skip_dirs.contains(&name) {
            self.skip_dirs.push(name);
        }
        self
    }

    /// Skip every name in `names` as well.
    pub fn skip_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self = self.skip_dir(name);
        }
        self
    }

    /// Whether `name` is a recognized lock file.
    pub fn is_lock_file(&self, name: &str) -> bool {
        self.lock_files.iter().any(|l| l == name)
    }

    /// Whether traversal should not descend into an entry called `name`.
    pub fn should_skip(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|s| s == name)
    }

    /// The recognized lock files among `entries`, in listing order.
    pub fn lock_files_in<'a>(&self, entries: &'a [String]) -> Vec<&'a str> {
        entries
            .iter()
            .map(String::as_str)
            .filter(|e| self.is_lock_file(e))
            .collect()
    }
}
