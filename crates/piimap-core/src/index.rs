//! # Index Documents
//!
//! A group-level index document (`country-index.json`) summarises every
//! valid record of one framework directory. It is generated, never
//! authored, and is consumed by the path auditor, the coverage aggregator
//! and the website.
//!
//! Serialized field order is fixed by declaration order:
//! `framework, region, last_updated, countries`.
//!
//! Stored indexes may have been edited by hand, so consumers that only need
//! names and paths read them through [`StoredIndex`] instead.

use serde::{Deserialize, Serialize};

use crate::status::CompletenessStatus;

/// Per-record summary inside an [`IndexDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Display (country) name.
    pub name: String,
    pub slug: String,
    /// Canonical path, normally `data/<group>/<filename>`. Empty when a
    /// stored index omits the field.
    #[serde(default)]
    pub path: String,
    pub status: CompletenessStatus,
}

/// Index of one framework group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub framework: String,
    pub region: String,
    /// Generation date. Excluded from drift comparison.
    pub last_updated: String,
    pub countries: Vec<IndexEntry>,
}

impl IndexDocument {
    /// Display names of all entries, in stored order.
    pub fn country_names(&self) -> Vec<String> {
        self.countries.iter().map(|c| c.name.clone()).collect()
    }

    /// Sort entries by display name (stable, lexicographic).
    pub fn sort_entries(&mut self) {
        self.countries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Serialize as pretty JSON with a trailing newline.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

/// Lenient view of a stored index: only `framework` and each entry's
/// `name` and `path`. Missing and unknown fields are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StoredIndex {
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub countries: Vec<StoredEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StoredEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl StoredIndex {
    /// Names of the entries that have one, in stored order.
    pub fn country_names(&self) -> Vec<String> {
        self.countries.iter().filter_map(|c| c.name.clone()).collect()
    }
}

impl From<&IndexDocument> for StoredIndex {
    fn from(doc: &IndexDocument) -> Self {
        Self {
            framework: Some(doc.framework.clone()),
            countries: doc
                .countries
                .iter()
                .map(|c| StoredEntry {
                    name: Some(c.name.clone()),
                    path: Some(c.path.clone()),
                })
                .collect(),
        }
    }
}
