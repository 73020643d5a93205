//! Reading and writing index documents.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use piimap_core::{IndexDocument, StoredIndex};

use crate::error::{IndexError, IndexResult};

/// Filename of every group index.
pub const INDEX_FILENAME: &str = "country-index.json";

/// Read and parse a stored index document.
pub fn read_index(path: &Path) -> IndexResult<IndexDocument> {
    read_json(path)
}

/// Read a stored index through the lenient [`StoredIndex`] view.
pub fn read_stored_index(path: &Path) -> IndexResult<StoredIndex> {
    read_json(path)
}

/// Read a stored index as untyped JSON, keeping every key.
pub fn read_index_value(path: &Path) -> IndexResult<Value> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> IndexResult<T> {
    let content = std::fs::read_to_string(path).map_err(|source| IndexError::IndexRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| IndexError::IndexParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `document` as pretty UTF-8 JSON with a trailing newline.
pub fn write_index(path: &Path, document: &IndexDocument) -> IndexResult<()> {
    let content = document.to_pretty_json()?;
    std::fs::write(path, content).map_err(|source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    })
}
