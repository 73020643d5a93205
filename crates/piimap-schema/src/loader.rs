//! YAML record loading.
//!
//! Parses record files with `serde_yaml` and converts them into
//! `serde_json::Value` for schema validation and typed deserialization.
//! `serde_yaml` has no implicit timestamp type, so `last_updated: 2025-11-20`
//! arrives as a string exactly as written.
//!
//! [`load_record_yaml`] keeps the `serde_yaml::Value` instead; its mappings
//! preserve key order, which the lint pass inspects.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// File extensions recognised as records.
pub const RECORD_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Errors raised while reading a record file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("record file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The document root is not a mapping.
    #[error("record at {path} is not a mapping")]
    NotAMapping { path: PathBuf },

    /// The YAML contains a value with no JSON representation.
    #[error("{path}: {detail}")]
    JsonIncompatible { path: PathBuf, detail: String },
}

/// Whether `path` has a record file extension.
pub fn is_record_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RECORD_EXTENSIONS.contains(&e))
}

/// Load a record file as a `serde_yaml::Value`, preserving key order.
pub fn load_record_yaml(path: &Path) -> Result<serde_yaml::Value, LoadError> {
    let content = read(path)?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| LoadError::YamlParse {
            path: path.to_path_buf(),
            source: e,
        })?;
    if !value.is_mapping() {
        return Err(LoadError::NotAMapping {
            path: path.to_path_buf(),
        });
    }
    Ok(value)
}

/// Load a record file and convert it to a `serde_json::Value`.
pub fn load_record_value(path: &Path) -> Result<Value, LoadError> {
    let yaml = load_record_yaml(path)?;
    yaml_to_json_value(yaml).map_err(|detail| LoadError::JsonIncompatible {
        path: path.to_path_buf(),
        detail,
    })
}

/// Recursively collect record files under `dir`, sorted by path.
///
/// Unreadable directories are logged and skipped.
pub fn find_record_files(dir: &Path) -> Vec<PathBuf> {
    let mut acc = Vec::new();
    walk_for_records(dir, &mut acc);
    acc.sort();
    acc
}

fn walk_for_records(dir: &Path, acc: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory during record walk");
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            walk_for_records(&path, acc);
        } else if is_record_file(&path) {
            acc.push(path);
        }
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Convert a `serde_yaml::Value` tree to a `serde_json::Value` tree.
///
/// Tags are stripped. Non-string mapping keys are stringified. Non-finite
/// floats have no JSON form and are rejected.
fn yaml_to_json_value(yaml: serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {n} in JSON"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s)),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> =
                seq.into_iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut obj = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                obj.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(obj))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(tagged.value),
    }
}
