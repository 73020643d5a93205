//! # piimap-cli: Dataset Tooling for OpenPIIMap
//!
//! Provides the `piimap` command-line interface over the record tree in
//! `data/`.
//!
//! ## Subcommands
//!
//! - `piimap validate`: Schema validation of every record (or one file).
//! - `piimap lint`: Field order, tags and citation authority checks.
//! - `piimap generate-index`: Build, preview or verify `country-index.json`.
//! - `piimap audit-paths`: Check every index entry points at a real file.
//! - `piimap coverage`: Write the framework → countries coverage map.
//! - `piimap audit-types`: Category type census.
//!
//! ```bash
//! piimap validate
//! piimap generate-index --group gdpr --dry-run
//! piimap generate-index --verify
//! piimap coverage --out site/coverage.json
//! ```
//!
//! Handlers return a process exit code: 0 clean, 1 when at least one
//! violation or mismatch was found. Fatal errors surface as `Err` and map
//! to exit code 2 in `main`.

pub mod audit_paths;
pub mod audit_types;
pub mod config;
pub mod coverage;
pub mod generate_index;
pub mod lint;
pub mod validate;

use std::path::{Path, PathBuf};

/// Directory that marks the repository root.
pub const DATA_DIR_NAME: &str = "data";

/// Exit code for a clean run.
pub const EXIT_OK: u8 = 0;
/// Exit code when at least one violation or mismatch was found.
pub const EXIT_VIOLATIONS: u8 = 1;
/// Exit code for fatal errors.
pub const EXIT_FATAL: u8 = 2;

/// Resolve a path that may be relative to the repository root.
///
/// If the path is absolute, returns it as-is. If relative and the file
/// exists relative to `repo_root`, uses that. Otherwise returns the path
/// relative to the current directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Walk up from `start` to the first directory containing `data/`.
pub fn resolve_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(DATA_DIR_NAME).is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// `path` relative to `base` for display, or unchanged if outside it.
pub fn display_path<'a>(path: &'a Path, base: &Path) -> std::path::Display<'a> {
    path.strip_prefix(base).unwrap_or(path).display()
}
