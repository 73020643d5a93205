//! Coverage aggregation: one framework → sorted country names map built
//! from every stored index. Indexes are folded in sorted path order and a
//! later index with the same framework replaces an earlier one.
//!
//! Only `framework` and each entry's `name` are read; an index without a
//! framework is reported and left out.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use piimap_core::StoredIndex;

use crate::error::{IndexError, IndexResult};
use crate::scan;
use crate::store;

/// Framework name → sorted display names.
pub type CoverageMap = BTreeMap<String, Vec<String>>;

/// Parsed indexes plus the ones that could not be read.
#[derive(Debug, Default)]
pub struct CoverageRun {
    pub documents: Vec<(PathBuf, StoredIndex)>,
    pub failures: Vec<(PathBuf, IndexError)>,
}

impl CoverageRun {
    pub fn coverage(&self) -> CoverageMap {
        aggregate(self.documents.iter().map(|(_, doc)| doc))
    }
}

/// Fold stored indexes into a coverage map. Indexes without a framework
/// are skipped.
pub fn aggregate<'a, I>(documents: I) -> CoverageMap
where
    I: IntoIterator<Item = &'a StoredIndex>,
{
    let mut map = CoverageMap::new();
    for doc in documents {
        let Some(framework) = &doc.framework else {
            continue;
        };
        let mut names = doc.country_names();
        names.sort();
        if map.insert(framework.clone(), names).is_some() {
            tracing::debug!(%framework, "later index replaces earlier coverage entry");
        }
    }
    map
}

/// Read every index under `data_root`.
pub fn collect_indexes(data_root: &Path, index_filename: &str) -> IndexResult<CoverageRun> {
    scan::ensure_data_root(data_root)?;
    let mut run = CoverageRun::default();
    for path in scan::find_index_files(data_root, index_filename) {
        let read = store::read_stored_index(&path).and_then(|doc| match doc.framework {
            Some(_) => Ok(doc),
            None => Err(IndexError::MissingFramework { path: path.clone() }),
        });
        match read {
            Ok(doc) => run.documents.push((path, doc)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable index");
                run.failures.push((path, e));
            }
        }
    }
    Ok(run)
}

/// Write the coverage map as pretty JSON with a trailing newline.
pub fn write_coverage(path: &Path, coverage: &CoverageMap) -> IndexResult<()> {
    let mut content = serde_json::to_string_pretty(coverage)?;
    content.push('\n');
    std::fs::write(path, content).map_err(|source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    })
}
