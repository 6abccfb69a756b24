//! Validation report built from scan results.
//!
//! A package without any governing lock file is invalid. The report lists
//! the invalid manifests separately from the valid ones and can be written
//! as JSON next to other CI artifacts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LockscanError;
use crate::scanner::PackageRecord;
use crate::Result;

/// File name of the saved report.
pub const LOCK_FILES_REPORT_FILENAME: &str = "lock-files-report.json";

/// Summary of a scan, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True when every package has at least one lock file
    pub succeeded: bool,
    pub total_packages: usize,
    pub invalid_packages: usize,
    /// Packages with lock files, in scan order
    pub valid_package_files: Vec<PackageRecord>,
    /// Manifest paths of packages without lock files, in scan order
    pub invalid_package_files: Vec<String>,
}

impl ValidationReport {
    /// Split scan records into valid and invalid packages.
    pub fn from_records(records: Vec<PackageRecord>) -> Self {
        let total_packages = records.len();
        let (valid_package_files, invalid): (Vec<_>, Vec<_>) =
            records.into_iter().partition(PackageRecord::has_lock_file);

        let invalid_package_files: Vec<String> = invalid
            .into_iter()
            .map(|record| record.package_json_path)
            .collect();

        Self {
            succeeded: invalid_package_files.is_empty(),
            total_packages,
            invalid_packages: invalid_package_files.len(),
            valid_package_files,
            invalid_package_files,
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report into `dir`, creating it if needed.
    ///
    /// Returns the path of the written file.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        let path = dir.join(LOCK_FILES_REPORT_FILENAME);
        let json = self.to_json()?;

        std::fs::create_dir_all(dir).map_err(|source| LockscanError::ReportWrite {
            path: dir.to_path_buf(),
            source,
        })?;
        std::fs::write(&path, json).map_err(|source| LockscanError::ReportWrite {
            path: path.clone(),
            source,
        })?;

        tracing::info!("validation report saved to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(path: &str, locks: &[&str], workspace: bool) -> PackageRecord {
        PackageRecord {
            package_json_path: path.to_string(),
            lock_file_paths: locks.iter().map(|s| s.to_string()).collect(),
            workspace_package: workspace,
        }
    }

    #[test]
    fn test_all_valid() {
        let report = ValidationReport::from_records(vec![
            record("package.json", &["yarn.lock"], false),
            record("packages/a/package.json", &["yarn.lock"], true),
        ]);

        assert!(report.succeeded);
        assert_eq!(report.total_packages, 2);
        assert_eq!(report.invalid_packages, 0);
        assert_eq!(report.valid_package_files.len(), 2);
        assert!(report.invalid_package_files.is_empty());
    }

    #[test]
    fn test_invalid_packages_are_split_out() {
        let report = ValidationReport::from_records(vec![
            record("package.json", &["yarn.lock"], false),
            record("tools/a/package.json", &[], false),
            record("packages/b/package.json", &["yarn.lock"], true),
            record("tools/c/package.json", &[], false),
        ]);

        assert!(!report.succeeded);
        assert_eq!(report.total_packages, 4);
        assert_eq!(report.invalid_packages, 2);
        assert_eq!(
            report.invalid_package_files,
            vec!["tools/a/package.json", "tools/c/package.json"]
        );
        assert_eq!(
            report
                .valid_package_files
                .iter()
                .map(|r| r.package_json_path.as_str())
                .collect::<Vec<_>>(),
            vec!["package.json", "packages/b/package.json"]
        );
    }

    #[test]
    fn test_empty_scan_succeeds() {
        let report = ValidationReport::from_records(vec![]);

        assert!(report.succeeded);
        assert_eq!(report.total_packages, 0);
    }

    #[test]
    fn test_json_shape() {
        let report =
            ValidationReport::from_records(vec![record("package.json", &["yarn.lock"], false)]);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "succeeded": true,
                "totalPackages": 1,
                "invalidPackages": 0,
                "validPackageFiles": [{
                    "packageJsonPath": "package.json",
                    "lockFilePaths": ["yarn.lock"],
                    "workspacePackage": false
                }],
                "invalidPackageFiles": []
            })
        );
    }

    #[test]
    fn test_save_creates_directory() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("artifacts/nested");
        let report = ValidationReport::from_records(vec![record("package.json", &[], false)]);

        let path = report.save(&dir).unwrap();

        assert_eq!(path, dir.join(LOCK_FILES_REPORT_FILENAME));
        let saved: ValidationReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, report);
    }

    #[test]
    fn test_save_into_file_fails() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("artifacts");
        std::fs::write(&blocker, "").unwrap();

        let result = ValidationReport::from_records(vec![]).save(&blocker);

        assert!(matches!(result, Err(LockscanError::ReportWrite { .. })));
    }
}
