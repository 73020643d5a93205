//! Dataset discovery: group directories, record files, index files.
//!
//! All listings are sorted so runs are deterministic regardless of
//! directory iteration order.

use std::path::{Path, PathBuf};

use piimap_schema::loader::is_record_file;

use crate::error::{IndexError, IndexResult};

/// Fail with [`IndexError::DataRootMissing`] unless `data_dir` is a directory.
pub fn ensure_data_root(data_dir: &Path) -> IndexResult<()> {
    if data_dir.is_dir() {
        Ok(())
    } else {
        Err(IndexError::DataRootMissing {
            path: data_dir.to_path_buf(),
        })
    }
}

/// Immediate subdirectories of `data_dir`, one per group, sorted by name.
pub fn list_groups(data_dir: &Path) -> IndexResult<Vec<PathBuf>> {
    ensure_data_root(data_dir)?;
    let mut groups = Vec::new();
    for entry in std::fs::read_dir(data_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            groups.push(path);
        }
    }
    groups.sort();
    Ok(groups)
}

/// Record files directly inside `group_dir`, excluding the derived index.
pub fn list_group_records(group_dir: &Path, index_filename: &str) -> IndexResult<Vec<PathBuf>> {
    if !group_dir.is_dir() {
        return Err(IndexError::GroupNotFound {
            path: group_dir.to_path_buf(),
        });
    }
    let mut records = Vec::new();
    for entry in std::fs::read_dir(group_dir)? {
        let path = entry?.path();
        let is_index = path.file_name().and_then(|f| f.to_str()) == Some(index_filename);
        if path.is_file() && !is_index && is_record_file(&path) {
            records.push(path);
        }
    }
    records.sort();
    Ok(records)
}

/// Every file named `index_filename` under `data_dir`, recursively.
pub fn find_index_files(data_dir: &Path, index_filename: &str) -> Vec<PathBuf> {
    let mut acc = Vec::new();
    walk_for_index(data_dir, index_filename, &mut acc);
    acc.sort();
    acc
}

fn walk_for_index(dir: &Path, index_filename: &str, acc: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "failed to read directory during index walk");
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk_for_index(&path, index_filename, acc);
        } else if path.file_name().and_then(|f| f.to_str()) == Some(index_filename) {
            acc.push(path);
        }
    }
}

/// Directory name of a group, used in canonical paths.
pub fn group_name(group_dir: &Path) -> String {
    group_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
