//! Workspace root detection.
//!
//! A directory is a workspace root when it declares member globs, either in
//! a dedicated `pnpm-workspace.yaml` or in the `workspaces` field of its
//! `package.json`. npm, yarn and bun accept both shapes of that field:
//!
//! ```json
//! { "workspaces": ["packages/*"] }
//! { "workspaces": { "packages": ["packages/*"] } }
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::fs::{to_slash_path, FileSystem};
use crate::matcher::PatternSet;
use crate::options::ScanOptions;

/// A registered workspace root and its member globs.
#[derive(Debug, Clone)]
pub struct WorkspaceInfo {
    /// Directory holding the workspace manifest and lock file
    pub root: PathBuf,
    /// Member globs, relative to `root`, in declaration order
    pub patterns: Vec<String>,
    matcher: PatternSet,
}

impl WorkspaceInfo {
    pub fn new(root: impl Into<PathBuf>, patterns: Vec<String>) -> Self {
        let matcher = PatternSet::new(&patterns);
        Self {
            root: root.into(),
            patterns,
            matcher,
        }
    }

    /// Whether the package owning `manifest` is a member of this workspace.
    ///
    /// The manifest's directory, relative to the workspace root, must be
    /// accepted by the member globs. The root's own manifest and manifests
    /// outside the root never are.
    pub fn contains_manifest(&self, manifest: &Path) -> bool {
        let Ok(relative) = manifest.strip_prefix(&self.root) else {
            return false;
        };
        let Some(package_dir) = relative.parent() else {
            return false;
        };
        if package_dir.as_os_str().is_empty() {
            return false;
        }

        self.matcher.is_match(&to_slash_path(package_dir))
    }
}

/// Outcome of reading one pattern source.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigRead<T> {
    /// File missing, or it declares no members
    Absent,
    /// File exists but could not be read or parsed
    Failed(String),
    Found(T),
}

#[derive(Debug, Deserialize)]
struct PnpmWorkspace {
    #[serde(default)]
    packages: Vec<String>,
}

fn read_text(fs: &dyn FileSystem, path: &Path) -> Result<String, ConfigRead<Vec<String>>> {
    fs.read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ConfigRead::Absent,
        _ => ConfigRead::Failed(err.to_string()),
    })
}

fn read_pnpm_workspace(fs: &dyn FileSystem, path: &Path) -> ConfigRead<Vec<String>> {
    let content = match read_text(fs, path) {
        Ok(content) => content,
        Err(outcome) => return outcome,
    };

    match serde_yaml::from_str::<Option<PnpmWorkspace>>(&content) {
        Ok(Some(config)) if !config.packages.is_empty() => ConfigRead::Found(config.packages),
        Ok(_) => ConfigRead::Absent,
        Err(err) => ConfigRead::Failed(err.to_string()),
    }
}

/// Extract the member globs from a parsed `package.json`.
fn manifest_workspaces(manifest: &Value) -> Option<Vec<String>> {
    let list = match manifest.get("workspaces")? {
        Value::Array(items) => items,
        Value::Object(fields) => fields.get("packages")?.as_array()?,
        _ => return None,
    };

    Some(
        list.iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
    )
}

fn read_manifest_workspaces(fs: &dyn FileSystem, path: &Path) -> ConfigRead<Vec<String>> {
    let content = match read_text(fs, path) {
        Ok(content) => content,
        Err(outcome) => return outcome,
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(manifest) => match manifest_workspaces(&manifest) {
            Some(patterns) => ConfigRead::Found(patterns),
            None => ConfigRead::Absent,
        },
        Err(err) => ConfigRead::Failed(err.to_string()),
    }
}

/// Read the workspace member globs declared in `dir`, if any.
///
/// `pnpm-workspace.yaml` takes precedence over `package.json` when it
/// declares a non-empty `packages` list. An unreadable or malformed source
/// is logged and ends the lookup: the directory declares nothing, even if a
/// later source would have parsed.
///
/// Returns `None` when `dir` is not a workspace root, and `Some` (possibly
/// empty, from an empty `workspaces` array) when it is.
pub fn read_workspace_patterns(
    fs: &dyn FileSystem,
    dir: &Path,
    entries: &[String],
    options: &ScanOptions,
) -> Option<Vec<String>> {
    let has_entry = |name: &str| entries.iter().any(|e| e == name);

    let mut sources: Vec<(PathBuf, fn(&dyn FileSystem, &Path) -> ConfigRead<Vec<String>>)> =
        Vec::new();
    if has_entry(options.workspace_manifest.as_str()) {
        sources.push((dir.join(&options.workspace_manifest), read_pnpm_workspace));
    }
    if has_entry(options.manifest.as_str()) {
        sources.push((dir.join(&options.manifest), read_manifest_workspaces));
    }

    for (path, read) in sources {
        match read(fs, &path) {
            ConfigRead::Found(patterns) => {
                tracing::debug!(
                    "{} declares workspace patterns {:?}",
                    path.display(),
                    patterns
                );
                return Some(patterns);
            }
            ConfigRead::Failed(reason) => {
                tracing::debug!("ignoring workspace config in {}: {}", path.display(), reason);
                return None;
            }
            ConfigRead::Absent => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn entries(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn patterns_in(fs: &MemoryFileSystem, names: &[&str]) -> Option<Vec<String>> {
        read_workspace_patterns(fs, Path::new("/repo"), &entries(names), &ScanOptions::new())
    }

    #[test]
    fn test_package_json_array() {
        let fs = MemoryFileSystem::new()
            .file("/repo/package.json", r#"{"workspaces": ["packages/*", "apps/*"]}"#);

        assert_eq!(
            patterns_in(&fs, &["package.json"]),
            Some(vec!["packages/*".to_string(), "apps/*".to_string()])
        );
    }

    #[test]
    fn test_package_json_object_form() {
        let fs = MemoryFileSystem::new().file(
            "/repo/package.json",
            r#"{"workspaces": {"packages": ["packages/*"], "nohoist": ["**/react"]}}"#,
        );

        assert_eq!(
            patterns_in(&fs, &["package.json"]),
            Some(vec!["packages/*".to_string()])
        );
    }

    #[test]
    fn test_package_json_empty_array_is_a_workspace() {
        let fs = MemoryFileSystem::new().file("/repo/package.json", r#"{"workspaces": []}"#);

        assert_eq!(patterns_in(&fs, &["package.json"]), Some(vec![]));
    }

    #[test]
    fn test_package_json_without_workspaces() {
        let fs = MemoryFileSystem::new().file("/repo/package.json", r#"{"name": "app"}"#);

        assert_eq!(patterns_in(&fs, &["package.json"]), None);
    }

    #[test]
    fn test_package_json_wrong_workspaces_shape() {
        let fs = MemoryFileSystem::new()
            .file("/repo/package.json", r#"{"workspaces": "packages/*"}"#);

        assert_eq!(patterns_in(&fs, &["package.json"]), None);
    }

    #[test]
    fn test_package_json_non_string_items_are_ignored() {
        let fs = MemoryFileSystem::new()
            .file("/repo/package.json", r#"{"workspaces": ["packages/*", 42, null]}"#);

        assert_eq!(
            patterns_in(&fs, &["package.json"]),
            Some(vec!["packages/*".to_string()])
        );
    }

    #[test]
    fn test_malformed_package_json() {
        let fs = MemoryFileSystem::new().file("/repo/package.json", "{ not json");

        assert_eq!(patterns_in(&fs, &["package.json"]), None);
    }

    #[test]
    fn test_empty_package_json() {
        let fs = MemoryFileSystem::new().file("/repo/package.json", "");

        assert_eq!(patterns_in(&fs, &["package.json"]), None);
    }

    #[test]
    fn test_unreadable_package_json() {
        // Listed but never declared as a file
        let fs = MemoryFileSystem::new();

        assert_eq!(patterns_in(&fs, &["package.json"]), None);
    }

    #[test]
    fn test_not_listed_is_not_read() {
        let fs = MemoryFileSystem::new().file("/repo/package.json", r#"{"workspaces": ["a/*"]}"#);

        assert_eq!(patterns_in(&fs, &["yarn.lock"]), None);
    }

    #[test]
    fn test_pnpm_workspace_yaml() {
        let fs = MemoryFileSystem::new()
            .file(
                "/repo/pnpm-workspace.yaml",
                "packages:\n  - 'packages/*'\n  - '!**/test/**'\n",
            )
            .file("/repo/package.json", r#"{"workspaces": ["ignored/*"]}"#);

        assert_eq!(
            patterns_in(&fs, &["package.json", "pnpm-workspace.yaml"]),
            Some(vec!["packages/*".to_string(), "!**/test/**".to_string()])
        );
    }

    #[test]
    fn test_pnpm_workspace_without_packages_falls_back() {
        let fs = MemoryFileSystem::new()
            .file("/repo/pnpm-workspace.yaml", "catalog:\n  react: ^18.0.0\n")
            .file("/repo/package.json", r#"{"workspaces": ["apps/*"]}"#);

        assert_eq!(
            patterns_in(&fs, &["pnpm-workspace.yaml", "package.json"]),
            Some(vec!["apps/*".to_string()])
        );
    }

    #[test]
    fn test_pnpm_workspace_empty_packages_falls_back() {
        let fs = MemoryFileSystem::new()
            .file("/repo/pnpm-workspace.yaml", "packages: []\n")
            .file("/repo/package.json", r#"{"name": "root"}"#);

        assert_eq!(patterns_in(&fs, &["pnpm-workspace.yaml", "package.json"]), None);
    }

    #[test]
    fn test_malformed_pnpm_workspace_hides_package_json() {
        let fs = MemoryFileSystem::new()
            .file("/repo/pnpm-workspace.yaml", "packages: [unclosed\n")
            .file("/repo/package.json", r#"{"workspaces": ["apps/*"]}"#);

        assert_eq!(patterns_in(&fs, &["pnpm-workspace.yaml", "package.json"]), None);
    }

    #[test]
    fn test_empty_pnpm_workspace() {
        let fs = MemoryFileSystem::new().file("/repo/pnpm-workspace.yaml", "");

        assert_eq!(patterns_in(&fs, &["pnpm-workspace.yaml"]), None);
    }

    #[test]
    fn test_source_outcomes_are_distinct() {
        let fs = MemoryFileSystem::new()
            .file("/repo/good.json", r#"{"workspaces": ["a/*"]}"#)
            .file("/repo/plain.json", r#"{"name": "x"}"#)
            .file("/repo/bad.json", "{");

        assert_eq!(
            read_manifest_workspaces(&fs, Path::new("/repo/good.json")),
            ConfigRead::Found(vec!["a/*".to_string()])
        );
        assert_eq!(
            read_manifest_workspaces(&fs, Path::new("/repo/plain.json")),
            ConfigRead::Absent
        );
        assert_eq!(
            read_manifest_workspaces(&fs, Path::new("/repo/missing.json")),
            ConfigRead::Absent
        );
        assert!(matches!(
            read_manifest_workspaces(&fs, Path::new("/repo/bad.json")),
            ConfigRead::Failed(_)
        ));
    }

    #[test]
    fn test_contains_manifest() {
        let ws = WorkspaceInfo::new("/repo", vec!["packages/*".to_string()]);

        assert!(ws.contains_manifest(Path::new("/repo/packages/app1/package.json")));
        assert!(!ws.contains_manifest(Path::new("/repo/packages/a/b/package.json")));
        assert!(!ws.contains_manifest(Path::new("/repo/apps/web/package.json")));
    }

    #[test]
    fn test_root_manifest_is_not_a_member() {
        let ws = WorkspaceInfo::new("/repo", vec!["**".to_string(), "*".to_string()]);

        assert!(!ws.contains_manifest(Path::new("/repo/package.json")));
        assert!(!ws.contains_manifest(Path::new("/repo")));
    }

    #[test]
    fn test_manifest_outside_root_is_not_a_member() {
        let ws = WorkspaceInfo::new("/repo/sub", vec!["**".to_string()]);

        assert!(!ws.contains_manifest(Path::new("/repo/other/package.json")));
        assert!(!ws.contains_manifest(Path::new("/repo/sub2/x/package.json")));
    }

    #[test]
    fn test_negated_member_pattern() {
        let ws = WorkspaceInfo::new(
            "/repo",
            vec!["packages/*".to_string(), "!packages/legacy".to_string()],
        );

        assert!(ws.contains_manifest(Path::new("/repo/packages/ui/package.json")));
        assert!(!ws.contains_manifest(Path::new("/repo/packages/legacy/package.json")));
    }
}
