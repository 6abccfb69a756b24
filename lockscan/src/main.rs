//! # lockscan
//!
//! A CLI tool that reports which lock file governs every `package.json` in a
//! source tree.
//!
//! ## Overview
//!
//! lockscan is built on top of lockscanlib. It walks a repository, resolves
//! the lock file(s) for each package (following workspace declarations in
//! monorepos) and prints which packages have none.
//!
//! ## Usage
//!
//! ```bash
//! # Check the current directory
//! lockscan
//!
//! # Check a checkout and save lock-files-report.json into ./artifacts
//! lockscan ./repo --artifacts ./artifacts
//!
//! # Machine-readable report on stdout
//! lockscan ./repo --output json
//!
//! # Skip vendored packages as well as the usual build directories
//! lockscan . --skip-dir vendor
//! ```
//!
//! Relative paths are resolved against `INIT_CWD` when it is set, so the
//! tool behaves the same when launched through an npm script.

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use lockscanlib::{discover_lock_files, OsFileSystem, ScanOptions, ValidationReport};
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("lockscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Report which lock files govern every package.json in a source tree")
        .arg(
            Arg::new("path")
                .help("Path to scan (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("artifacts")
                .short('a')
                .long("artifacts")
                .value_name("DIR")
                .help("Directory to save lock-files-report.json into"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .arg(
            Arg::new("skip-dir")
                .long("skip-dir")
                .value_name("NAME")
                .action(ArgAction::Append)
                .help("Also skip directories with this name (can be specified multiple times)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
}

fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lockscan={level},lockscanlib={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))
}

/// Directory relative paths are resolved against
fn base_dir() -> PathBuf {
    std::env::var_os("INIT_CWD")
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Build scan options from matches
fn build_options(matches: &ArgMatches) -> ScanOptions {
    let extra = matches
        .get_many::<String>("skip-dir")
        .map(|v| v.cloned().collect::<Vec<_>>())
        .unwrap_or_default();

    ScanOptions::new().skip_dirs(extra)
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let base = base_dir();
    let path = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .unwrap_or(".");
    let target = resolve(&base, path);
    let target = std::fs::canonicalize(&target).unwrap_or(target);
    let json = matches
        .get_one::<String>("output")
        .is_some_and(|s| s == "json");

    let options = build_options(matches);
    tracing::info!("checking lock files in {}", target.display());

    let records = discover_lock_files(&target, &OsFileSystem::new(), &options)
        .with_context(|| format!("failed to scan {}", target.display()))?;
    let report = ValidationReport::from_records(records);

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", render::render_header(&target));
        print!("{}", render::render_report(&report));
    }

    if let Some(artifacts) = matches.get_one::<String>("artifacts") {
        let saved = report
            .save(resolve(&base, artifacts))
            .context("failed to save validation report")?;
        if !json {
            print!("{}", render::render_saved(&saved));
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    if let Err(e) = init_tracing(matches.get_count("verbose")) {
        eprintln!("Warning: {e}");
    }

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
