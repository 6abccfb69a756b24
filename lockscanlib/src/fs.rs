//! Filesystem capability consumed by the scanner.
//!
//! The scanner only ever lists directories, checks entry types and reads
//! small text files, so that is all [`FileSystem`] asks for. Two
//! implementations ship with the crate:
//!
//! - [`OsFileSystem`]: the real disk
//! - [`MemoryFileSystem`]: an in-memory tree for tests and examples

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Read-only view of a directory tree.
pub trait FileSystem {
    /// List the entry names of a directory, in listing order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether `path` exists at all.
    fn exists(&self, path: &Path) -> bool;

    /// Read a file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The local disk.
///
/// Listings are sorted by file name so that scan output does not depend on
/// the order the OS happens to return entries in. Symlinked directories are
/// not reported as directories, which keeps link cycles out of the walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_dir() {
            return Err(io::Error::other(format!(
                "not a directory: {}",
                path.display()
            )));
        }

        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        let mut names = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => names.push(entry.file_name().to_string_lossy().into_owned()),
                // Failing to open the directory itself is the caller's problem
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(err) => {
                    tracing::debug!("skipping unreadable entry in {}: {}", path.display(), err);
                }
            }
        }

        Ok(names)
    }

    fn is_dir(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok_and(|m| m.is_dir())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Clone)]
enum Node {
    Dir(Vec<String>),
    File(String),
}

/// An in-memory directory tree.
///
/// Directories are declared with their children in listing order. A child
/// that is never declared itself behaves like an unreadable file: it shows
/// up in listings but is neither a directory nor readable.
///
/// ```rust
/// use lockscanlib::fs::{FileSystem, MemoryFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new()
///     .dir("/repo", &["package.json", "yarn.lock"])
///     .file("/repo/package.json", r#"{"name": "repo"}"#);
///
/// assert_eq!(fs.read_dir(Path::new("/repo")).unwrap(), vec!["package.json", "yarn.lock"]);
/// assert!(fs.read_to_string(Path::new("/repo/yarn.lock")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    nodes: HashMap<PathBuf, Node>,
}

impl MemoryFileSystem {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a directory and its children.
    pub fn dir(mut self, path: impl Into<PathBuf>, children: &[&str]) -> Self {
        let children = children.iter().map(|c| c.to_string()).collect();
        self.nodes.insert(path.into(), Node::Dir(children));
        self
    }

    /// Declare a file with its content.
    pub fn file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.nodes.insert(path.into(), Node::File(content.to_string()));
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        match self.nodes.get(path) {
            Some(Node::Dir(children)) => Ok(children.clone()),
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {}", path.display()),
            )),
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.get(path), Some(Node::Dir(_)))
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        match self.nodes.get(path) {
            Some(Node::File(content)) => Ok(content.clone()),
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )),
        }
    }
}
