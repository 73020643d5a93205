//! # Path Auditing
//!
//! Checks that every entry of every stored index points at an existing
//! file. Entry paths resolve as follows:
//!
//! - `data/...` is root-relative: the prefix is replaced by the data root,
//! - `../...` is relative to the directory holding the index,
//! - anything else is relative to the data root.
//!
//! Independently, a directory component containing hyphens is flagged as
//! naming drift when only its hyphen-free spelling exists on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use piimap_core::{StoredIndex, DATA_PREFIX};

use crate::error::IndexResult;
use crate::scan;
use crate::store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathViolationKind {
    /// The resolved file does not exist.
    Missing,
    /// A hyphenated directory name exists only without its hyphens.
    NamingDrift,
    /// The entry has no path.
    MissingPathField,
    /// The index itself could not be read or parsed.
    UnreadableIndex,
}

impl PathViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::NamingDrift => "naming-drift",
            Self::MissingPathField => "missing-path-field",
            Self::UnreadableIndex => "unreadable-index",
        }
    }
}

impl fmt::Display for PathViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem with one index entry (or a whole index file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathViolation {
    pub index: PathBuf,
    /// Display name of the offending entry; `None` for index-level problems.
    pub entry: Option<String>,
    /// The path as written in the index.
    pub path: String,
    pub kind: PathViolationKind,
    pub detail: String,
}

impl fmt::Display for PathViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.index.display(), self.kind)?;
        if let Some(name) = &self.entry {
            write!(f, " {name}")?;
        }
        if !self.path.is_empty() {
            write!(f, " '{}'", self.path)?;
        }
        write!(f, ": {}", self.detail)
    }
}

/// Outcome of auditing every index under a data root.
#[derive(Debug, Default)]
pub struct AuditReport {
    pub indexes: usize,
    pub entries: usize,
    pub violations: Vec<PathViolation>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Resolve an entry path to a filesystem location.
pub fn resolve_entry_path(path: &str, index_dir: &Path, data_root: &Path) -> PathBuf {
    if let Some(rest) = path.strip_prefix(DATA_PREFIX) {
        data_root.join(rest)
    } else if path.starts_with("../") {
        index_dir.join(path)
    } else {
        data_root.join(path)
    }
}

/// Audit one stored index read from `index_path`.
///
/// Only each entry's `name` and `path` are consulted, so entries missing
/// other fields are still audited.
pub fn audit(document: &StoredIndex, index_path: &Path, data_root: &Path) -> Vec<PathViolation> {
    let index_dir = index_path.parent().unwrap_or(data_root);
    let mut violations = Vec::new();

    for entry in &document.countries {
        let path = entry.path.as_deref().unwrap_or_default();
        let violation = |kind: PathViolationKind, detail: String| PathViolation {
            index: index_path.to_path_buf(),
            entry: entry.name.clone(),
            path: path.to_string(),
            kind,
            detail,
        };

        if path.is_empty() {
            violations.push(violation(
                PathViolationKind::MissingPathField,
                "entry has no path".to_string(),
            ));
            continue;
        }

        let resolved = resolve_entry_path(path, index_dir, data_root);
        if !resolved.exists() {
            violations.push(violation(
                PathViolationKind::Missing,
                format!("file does not exist: {}", resolved.display()),
            ));
        }

        if let Some(detail) = naming_drift(path, data_root) {
            violations.push(violation(PathViolationKind::NamingDrift, detail));
        }
    }

    violations
}

/// Read and audit the index at `index_path`.
pub fn audit_index_file(index_path: &Path, data_root: &Path) -> (usize, Vec<PathViolation>) {
    match store::read_stored_index(index_path) {
        Ok(document) => (
            document.countries.len(),
            audit(&document, index_path, data_root),
        ),
        Err(e) => (
            0,
            vec![PathViolation {
                index: index_path.to_path_buf(),
                entry: None,
                path: String::new(),
                kind: PathViolationKind::UnreadableIndex,
                detail: e.to_string(),
            }],
        ),
    }
}

/// Audit every file named `index_filename` under `data_root`.
///
/// # Errors
///
/// Fails only when `data_root` does not exist.
pub fn audit_tree(data_root: &Path, index_filename: &str) -> IndexResult<AuditReport> {
    scan::ensure_data_root(data_root)?;
    let mut report = AuditReport::default();
    for index_path in scan::find_index_files(data_root, index_filename) {
        let (entries, violations) = audit_index_file(&index_path, data_root);
        tracing::debug!(index = %index_path.display(), entries, violations = violations.len(), "audited index");
        report.indexes += 1;
        report.entries += entries;
        report.violations.extend(violations);
    }
    Ok(report)
}

fn naming_drift(path: &str, data_root: &Path) -> Option<String> {
    if !path.contains('/') || path.contains('\\') {
        return None;
    }
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() < 2 {
        return None;
    }
    let dir = parts[parts.len() - 2];
    if !dir.contains('-') {
        return None;
    }
    let collapsed = dir.replace('-', "");
    if data_root.join(&collapsed).exists() && !data_root.join(dir).exists() {
        Some(format!(
            "directory '{dir}' does not exist but '{collapsed}' does"
        ))
    } else {
        None
    }
}
