//! # Drift Verification
//!
//! Compares a stored index with a freshly built one. `last_updated` never
//! counts as drift; anything else does, including entry order and keys the
//! index model does not know about. Both sides are compared as raw JSON so
//! nothing is dropped by a typed parse.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};

use piimap_core::IndexDocument;

use crate::store;

const TIMESTAMP_KEY: &str = "last_updated";

/// How a stored index differs from the generated one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriftDetail {
    pub stored_count: usize,
    pub generated_count: usize,
    pub framework_changed: bool,
    pub region_changed: bool,
    /// Names only present in the stored index.
    pub only_stored: Vec<String>,
    /// Names only present in the generated index.
    pub only_generated: Vec<String>,
    /// Names present in both whose entry differs.
    pub changed: Vec<String>,
    /// Top-level keys other than framework, region and countries differ.
    pub other_fields_changed: bool,
}

impl fmt::Display for DriftDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generated {} entries, existing has {}",
            self.generated_count, self.stored_count
        )?;
        if self.framework_changed {
            f.write_str("; framework differs")?;
        }
        if self.region_changed {
            f.write_str("; region differs")?;
        }
        if !self.only_generated.is_empty() {
            write!(f, "; new: {}", self.only_generated.join(", "))?;
        }
        if !self.only_stored.is_empty() {
            write!(f, "; removed: {}", self.only_stored.join(", "))?;
        }
        if !self.changed.is_empty() {
            write!(f, "; changed: {}", self.changed.join(", "))?;
        }
        if self.other_fields_changed {
            f.write_str("; other fields differ")?;
        }
        Ok(())
    }
}

/// Result of checking one group's stored index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriftOutcome {
    /// Stored and generated content are identical.
    Match,
    /// No stored index exists.
    Missing,
    /// The stored index cannot be read or parsed.
    Unreadable(String),
    Differs(DriftDetail),
}

impl DriftOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

/// Compare two index objects, returning `None` when they are equal apart
/// from `last_updated`.
pub fn compare(stored: &Map<String, Value>, generated: &Map<String, Value>) -> Option<DriftDetail> {
    let stored = without_timestamp(stored);
    let generated = without_timestamp(generated);
    if stored == generated {
        return None;
    }

    let stored_by_name = entries_by_name(&stored);
    let generated_by_name = entries_by_name(&generated);
    let stored_names: BTreeSet<&str> = stored_by_name.keys().copied().collect();
    let generated_names: BTreeSet<&str> = generated_by_name.keys().copied().collect();

    let changed = stored_names
        .intersection(&generated_names)
        .filter(|name| stored_by_name.get(*name) != generated_by_name.get(*name))
        .map(|name| name.to_string())
        .collect();

    Some(DriftDetail {
        stored_count: entries(&stored).len(),
        generated_count: entries(&generated).len(),
        framework_changed: stored.get("framework") != generated.get("framework"),
        region_changed: stored.get("region") != generated.get("region"),
        only_stored: stored_names
            .difference(&generated_names)
            .map(|s| s.to_string())
            .collect(),
        only_generated: generated_names
            .difference(&stored_names)
            .map(|s| s.to_string())
            .collect(),
        changed,
        other_fields_changed: other_fields(&stored) != other_fields(&generated),
    })
}

/// Check `generated` against the index stored at `stored_path`.
pub fn verify_against_stored(stored_path: &Path, generated: &IndexDocument) -> DriftOutcome {
    if !stored_path.exists() {
        return DriftOutcome::Missing;
    }
    let stored = match store::read_index_value(stored_path) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return DriftOutcome::Unreadable("index is not a JSON object".to_string()),
        Err(e) => return DriftOutcome::Unreadable(e.to_string()),
    };
    let generated = match serde_json::to_value(generated) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return DriftOutcome::Unreadable("generated index is not a JSON object".to_string())
        }
        Err(e) => return DriftOutcome::Unreadable(e.to_string()),
    };
    match compare(&stored, &generated) {
        None => DriftOutcome::Match,
        Some(detail) => DriftOutcome::Differs(detail),
    }
}

fn without_timestamp(map: &Map<String, Value>) -> Map<String, Value> {
    let mut map = map.clone();
    map.remove(TIMESTAMP_KEY);
    map
}

fn entries(map: &Map<String, Value>) -> &[Value] {
    map.get("countries")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

// First entry wins when a name repeats. Entries without a string name only
// show up in the count.
fn entries_by_name(map: &Map<String, Value>) -> BTreeMap<&str, &Value> {
    let mut by_name = BTreeMap::new();
    for entry in entries(map) {
        if let Some(name) = entry.get("name").and_then(Value::as_str) {
            by_name.entry(name).or_insert(entry);
        }
    }
    by_name
}

fn other_fields(map: &Map<String, Value>) -> Map<String, Value> {
    let mut map = map.clone();
    for key in ["framework", "region", "countries"] {
        map.remove(key);
    }
    map
}
