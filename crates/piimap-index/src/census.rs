//! Category type census across the whole dataset.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde_json::Value;

use piimap_schema::loader;

/// Framework recorded for files without a `framework` field.
pub const UNKNOWN_FRAMEWORK: &str = "Unknown";

/// Type usage statistics.
#[derive(Debug, Default)]
pub struct TypeCensus {
    /// Record files that contributed at least one category.
    pub files: usize,
    /// Occurrences of each type.
    pub totals: BTreeMap<String, usize>,
    pub by_framework: BTreeMap<String, BTreeMap<String, usize>>,
    /// Relative paths of the files using each type.
    pub files_by_type: BTreeMap<String, BTreeSet<String>>,
    pub unreadable: Vec<(PathBuf, String)>,
}

impl TypeCensus {
    /// Types ordered by descending count, ties broken by name.
    pub fn most_common(&self) -> Vec<(&str, usize)> {
        ranked(&self.totals)
    }

    /// Per-framework types, ordered like [`most_common`](Self::most_common).
    pub fn most_common_in(&self, framework: &str) -> Vec<(&str, usize)> {
        self.by_framework.get(framework).map(ranked).unwrap_or_default()
    }

    fn add(&mut self, framework: &str, kind: &str, file: &str) {
        *self.totals.entry(kind.to_string()).or_default() += 1;
        *self
            .by_framework
            .entry(framework.to_string())
            .or_default()
            .entry(kind.to_string())
            .or_default() += 1;
        self.files_by_type
            .entry(kind.to_string())
            .or_default()
            .insert(file.to_string());
    }
}

fn ranked(counts: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut rows: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows
}

/// Tally category types of every record under `data_dir`.
pub fn census(data_dir: &Path) -> TypeCensus {
    let mut result = TypeCensus::default();
    for path in loader::find_record_files(data_dir) {
        let value = match loader::load_record_value(&path) {
            Ok(v) => v,
            Err(e) => {
                result.unreadable.push((path, e.to_string()));
                continue;
            }
        };
        let Some(categories) = value.get("categories").and_then(Value::as_array) else {
            continue;
        };
        let framework = value
            .get("framework")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_FRAMEWORK);
        let relative = path
            .strip_prefix(data_dir)
            .unwrap_or(path.as_path())
            .to_string_lossy()
            .into_owned();

        let mut counted = false;
        for category in categories {
            let Some(kind) = category.get("type") else {
                continue;
            };
            let kind = match kind {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            result.add(framework, &kind, &relative);
            counted = true;
        }
        if counted {
            result.files += 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    #[test]
    fn counts_types_overall_and_per_framework() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "gdpr/germany.yaml",
            "framework: GDPR\ncategories:\n  - type: direct_identifier\n  - type: direct_identifier\n  - type: special_category\n",
        );
        write(
            dir.path(),
            "hipaa/usa.yaml",
            "framework: HIPAA\ncategories:\n  - type: special_category\n  - name: no type\n",
        );
        write(dir.path(), "misc/notes.yaml", "title: not a record\n");

        let c = census(dir.path());
        assert_eq!(c.files, 2);
        assert_eq!(c.totals["direct_identifier"], 2);
        assert_eq!(c.totals["special_category"], 2);
        assert_eq!(
            c.most_common(),
            vec![("direct_identifier", 2), ("special_category", 2)]
        );
        assert_eq!(c.most_common_in("HIPAA"), vec![("special_category", 1)]);
        assert_eq!(c.files_by_type["special_category"].len(), 2);
        assert_eq!(c.files_by_type["direct_identifier"].len(), 1);
    }

    #[test]
    fn missing_framework_is_unknown_and_bad_files_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "x/a.yaml", "categories:\n  - type: quasi_identifier\n");
        write(dir.path(), "x/b.yaml", "categories: [oops\n");
        let c = census(dir.path());
        assert_eq!(c.most_common_in(UNKNOWN_FRAMEWORK), vec![("quasi_identifier", 1)]);
        assert_eq!(c.unreadable.len(), 1);
    }
}
