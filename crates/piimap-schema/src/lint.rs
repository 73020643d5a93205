//! # Record Linting
//!
//! Maintainer-facing checks that do not belong in the strict schema:
//!
//! - category keys out of the recommended order (warning),
//! - missing or empty `tags` (warning, with a suggestion from
//!   [`piimap_core::tags`] when the heuristic finds one),
//! - a citation without `regulation`, `national_law` or `authority` (error),
//! - unparseable YAML (error).
//!
//! Works on `serde_yaml::Value` because key order matters here.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use piimap_core::tags::infer_tags_from;

use crate::loader::{self, LoadError};

/// Recommended order of category keys. Unknown keys sort after these.
pub const RECOMMENDED_ORDER: &[&str] =
    &["name", "type", "subtype", "required_masking", "tags", "citations"];

/// Keys of which a citation must carry at least one.
const LEGAL_SOURCE_KEYS: &[&str] = &["regulation", "national_law", "authority"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintSeverity {
    Warning,
    Error,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "WARN",
            Self::Error => "ERROR",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintRule {
    FieldOrder,
    MissingTags,
    CitationAuthority,
    Yaml,
}

impl LintRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FieldOrder => "field-order",
            Self::MissingTags => "missing-tags",
            Self::CitationAuthority => "citation-authority",
            Self::Yaml => "yaml",
        }
    }

    pub fn severity(&self) -> LintSeverity {
        match self {
            Self::FieldOrder | Self::MissingTags => LintSeverity::Warning,
            Self::CitationAuthority | Self::Yaml => LintSeverity::Error,
        }
    }
}

/// One lint finding. `category` and `citation` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    pub path: PathBuf,
    pub category: Option<usize>,
    pub citation: Option<usize>,
    pub rule: LintRule,
    pub message: String,
}

impl LintFinding {
    pub fn severity(&self) -> LintSeverity {
        self.rule.severity()
    }
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity(), self.path.display())?;
        if let Some(c) = self.category {
            write!(f, " - category {c}")?;
        }
        if let Some(c) = self.citation {
            write!(f, ", citation {c}")?;
        }
        write!(f, " [{}]: {}", self.rule.as_str(), self.message)
    }
}

/// Findings across a data tree.
#[derive(Debug, Default)]
pub struct LintReport {
    pub files: usize,
    pub findings: Vec<LintFinding>,
}

impl LintReport {
    pub fn error_count(&self) -> usize {
        self.count(LintSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(LintSeverity::Warning)
    }

    fn count(&self, severity: LintSeverity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity() == severity)
            .count()
    }
}

/// Lint every record file under `data_dir`.
pub fn lint_tree(data_dir: &Path) -> LintReport {
    let files = loader::find_record_files(data_dir);
    let mut report = LintReport {
        files: files.len(),
        findings: Vec::new(),
    };
    for path in &files {
        report.findings.extend(lint_file(path));
    }
    report
}

/// Lint a single record file.
pub fn lint_file(path: &Path) -> Vec<LintFinding> {
    match loader::load_record_yaml(path) {
        Ok(value) => lint_value(path, &value),
        Err(e) => {
            let message = match &e {
                LoadError::YamlParse { source, .. } => format!("YAML error: {source}"),
                other => other.to_string(),
            };
            vec![LintFinding {
                path: path.to_path_buf(),
                category: None,
                citation: None,
                rule: LintRule::Yaml,
                message,
            }]
        }
    }
}

/// Lint an already-parsed record.
pub fn lint_value(path: &Path, record: &Value) -> Vec<LintFinding> {
    let mut findings = Vec::new();
    let Some(categories) = record.get("categories").and_then(Value::as_sequence) else {
        return findings;
    };

    for (idx, category) in categories.iter().enumerate() {
        let Some(mapping) = category.as_mapping() else {
            continue;
        };
        let finding = |rule: LintRule, citation: Option<usize>, message: String| LintFinding {
            path: path.to_path_buf(),
            category: Some(idx + 1),
            citation,
            rule,
            message,
        };

        let keys: Vec<&str> = mapping.keys().filter_map(Value::as_str).collect();
        if !keys_in_recommended_order(&keys) {
            findings.push(finding(
                LintRule::FieldOrder,
                None,
                "field order mismatch".to_string(),
            ));
        }

        if tags_missing(category.get("tags")) {
            let suggested = infer_tags_from(
                str_field(category, "type"),
                category.get("subtype").and_then(Value::as_str),
                str_field(category, "name"),
            );
            let message = if suggested.is_empty() {
                "missing or empty tags".to_string()
            } else {
                format!("missing or empty tags (suggested: {})", suggested.join(", "))
            };
            findings.push(finding(LintRule::MissingTags, None, message));
        }

        if let Some(citations) = category.get("citations").and_then(Value::as_sequence) {
            for (cidx, citation) in citations.iter().enumerate() {
                let has_source = LEGAL_SOURCE_KEYS.iter().any(|k| citation.get(*k).is_some());
                if !has_source {
                    findings.push(finding(
                        LintRule::CitationAuthority,
                        Some(cidx + 1),
                        "missing 'regulation' or national equivalent".to_string(),
                    ));
                }
            }
        }
    }

    findings
}

fn rank(key: &str) -> usize {
    RECOMMENDED_ORDER
        .iter()
        .position(|k| *k == key)
        .unwrap_or(RECOMMENDED_ORDER.len())
}

fn keys_in_recommended_order(keys: &[&str]) -> bool {
    let mut sorted = keys.to_vec();
    sorted.sort_by_key(|k| rank(k));
    sorted == keys
}

fn tags_missing(tags: Option<&Value>) -> bool {
    match tags {
        None | Some(Value::Null) => true,
        Some(Value::Sequence(seq)) => seq.is_empty(),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(_) => false,
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lint(yaml: &str) -> Vec<LintFinding> {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        lint_value(Path::new("data/gdpr/germany.yaml"), &value)
    }

    #[test]
    fn well_formed_record_has_no_findings() {
        let findings = lint(
            r#"
country: Germany
framework: GDPR
categories:
  - name: Email
    type: direct_identifier
    required_masking: true
    tags: [pii]
    citations:
      - regulation: GDPR
        article: "4"
"#,
        );
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[test]
    fn out_of_order_keys_are_a_warning() {
        let findings = lint(
            r#"
categories:
  - type: direct_identifier
    name: Email
    required_masking: true
    tags: [pii]
    citations: []
"#,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, LintRule::FieldOrder);
        assert_eq!(findings[0].severity(), LintSeverity::Warning);
        assert_eq!(findings[0].category, Some(1));
    }

    #[test]
    fn unknown_keys_may_follow_known_ones() {
        let findings = lint(
            r#"
categories:
  - name: Email
    type: direct_identifier
    required_masking: true
    tags: [pii]
    citations: []
    notes: extra
"#,
        );
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[test]
    fn missing_tags_suggest_inferred_labels() {
        let findings = lint(
            r#"
categories:
  - name: Health records
    type: special_category
    required_masking: true
    citations: []
"#,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, LintRule::MissingTags);
        assert!(findings[0].message.contains("phi, sensitive"));
    }

    #[test]
    fn citation_without_legal_source_is_an_error() {
        let findings = lint(
            r#"
categories:
  - name: Email
    type: direct_identifier
    required_masking: true
    tags: [pii]
    citations:
      - regulation: GDPR
      - article: "5"
"#,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, LintRule::CitationAuthority);
        assert_eq!(findings[0].severity(), LintSeverity::Error);
        assert_eq!(findings[0].citation, Some(2));
        let line = findings[0].to_string();
        assert!(line.contains("category 1, citation 2"));
    }

    #[test]
    fn unparseable_file_is_a_yaml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "categories: [unterminated\n").unwrap();
        let findings = lint_file(&path);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, LintRule::Yaml);
    }

    #[test]
    fn report_counts_by_severity() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.yaml"),
            "categories:\n  - name: Email\n    type: direct_identifier\n    required_masking: true\n    citations:\n      - article: \"5\"\n",
        )
        .unwrap();
        let report = lint_tree(dir.path());
        assert_eq!(report.files, 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
    }
}
