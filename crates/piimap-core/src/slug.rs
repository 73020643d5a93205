//! # Slug and Path Resolution
//!
//! The slug of a record is its filename with the extension stripped. The
//! human-readable country name is ignored so renaming a display name never
//! changes the slug or breaks external links. No case or punctuation
//! normalization is performed.
//!
//! The canonical path is `data/<group>/<filename>`, relative to the
//! repository root.

use std::path::Path;

use crate::error::CoreError;

/// Prefix shared by every canonical record path.
pub const DATA_PREFIX: &str = "data/";

/// Stable identifier and canonical storage path of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocation {
    pub slug: String,
    pub path: String,
}

/// Derive the slug and canonical path for `filename` inside `group`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidFilename`] if the filename is empty,
/// contains a path separator, or has no stem.
pub fn resolve(group: &str, filename: &str) -> Result<RecordLocation, CoreError> {
    let invalid = |reason: &str| CoreError::InvalidFilename {
        filename: filename.to_string(),
        reason: reason.to_string(),
    };

    if filename.is_empty() {
        return Err(invalid("empty filename"));
    }
    if filename.contains('/') || filename.contains('\\') {
        return Err(invalid("contains a path separator"));
    }

    let slug = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid("no file stem"))?;

    Ok(RecordLocation {
        slug: slug.to_string(),
        path: format!("{DATA_PREFIX}{group}/{filename}"),
    })
}
