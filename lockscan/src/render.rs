//! Console rendering of validation reports

use console::Style;
use lockscanlib::{PackageRecord, ValidationReport};
use std::fmt::Write;
use std::path::Path;

const INVALID_MARKER: &str = "🟥";
const VALID_MARKER: &str = "🟦";
const WORKSPACE_MARKER: &str = "🧩 workspace";

/// Styles used for report lines
struct Theme {
    missing: Style,
    path: Style,
    workspace: Style,
}

impl Theme {
    fn new() -> Self {
        Self {
            missing: Style::new().red(),
            path: Style::new().bold(),
            workspace: Style::new().cyan(),
        }
    }
}

/// Header printed before the per-package lines
pub fn render_header(target: &Path) -> String {
    format!("Checking lock files in: {}\n", target.display())
}

fn valid_line(theme: &Theme, record: &PackageRecord) -> String {
    let workspace = if record.workspace_package {
        format!(" ({})", theme.workspace.apply_to(WORKSPACE_MARKER))
    } else {
        String::new()
    };

    format!(
        "{} {} - {}{}",
        VALID_MARKER,
        theme.path.apply_to(&record.package_json_path),
        record.lock_file_paths.join(", "),
        workspace
    )
}

/// Render the report as it is shown on a terminal.
///
/// Packages missing a lock file come first, then every package with one,
/// then a summary line when anything is missing.
pub fn render_report(report: &ValidationReport) -> String {
    let theme = Theme::new();
    let mut out = String::new();

    for path in &report.invalid_package_files {
        let _ = writeln!(
            out,
            "{} {} - {}",
            INVALID_MARKER,
            theme.path.apply_to(path),
            theme.missing.apply_to("lock file missing")
        );
    }

    for record in &report.valid_package_files {
        let _ = writeln!(out, "{}", valid_line(&theme, record));
    }

    if report.invalid_packages > 0 {
        let _ = writeln!(
            out,
            "\n{} {}",
            INVALID_MARKER,
            theme.missing.apply_to(format!(
                "{} package(s) are missing lock files",
                report.invalid_packages
            ))
        );
    }

    out
}

/// Confirmation printed after the report file is written
pub fn render_saved(path: &Path) -> String {
    format!("\n✅ Validation report saved to: {}\n", path.display())
}
