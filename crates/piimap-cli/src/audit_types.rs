//! # Audit-Types Subcommand
//!
//! Prints the category type census: overall frequency, frequency per
//! framework, and the files using each type.

use anyhow::Result;
use clap::Args;

use piimap_index::{census, TypeCensus};

use crate::config::PipelineConfig;
use crate::{display_path, EXIT_OK};

/// Files listed per type before the list is truncated.
const FILES_SHOWN: usize = 5;

const RULE: &str = "================================================================================";

/// Arguments for the `piimap audit-types` subcommand.
#[derive(Args, Debug, Default)]
pub struct AuditTypesArgs {}

pub fn run_audit_types(_args: &AuditTypesArgs, config: &PipelineConfig) -> Result<u8> {
    piimap_index::scan::ensure_data_root(&config.data_dir)?;
    let result = census(&config.data_dir);

    for (path, reason) in &result.unreadable {
        println!("WARN: skipped {}: {reason}", display_path(path, &config.repo_root));
    }
    print!("{}", render(&result));
    Ok(EXIT_OK)
}

/// Render the census as the plain-text report printed by `audit-types`.
pub fn render(census: &TypeCensus) -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(RULE.to_string());
    line("TYPE USAGE AUDIT".to_string());
    line(RULE.to_string());
    line(format!("Total unique types found: {}", census.totals.len()));
    line(format!("Records scanned: {}", census.files));
    line(String::new());
    line("Type Frequency (sorted by usage):".to_string());
    for (kind, count) in census.most_common() {
        line(format!("  {kind:30} : {count:4} occurrences"));
    }

    line(String::new());
    line(RULE.to_string());
    line("TYPES BY FRAMEWORK".to_string());
    line(RULE.to_string());
    for framework in census.by_framework.keys() {
        line(format!("\n{framework}:"));
        for (kind, count) in census.most_common_in(framework) {
            line(format!("  {kind:30} : {count:4}"));
        }
    }

    line(String::new());
    line(RULE.to_string());
    line("FILES USING EACH TYPE".to_string());
    line(RULE.to_string());
    for (kind, files) in &census.files_by_type {
        line(format!("\n{kind}:"));
        line(format!("  Used in {} files", files.len()));
        for file in files.iter().take(FILES_SHOWN) {
            line(format!("    - {file}"));
        }
        if files.len() > FILES_SHOWN {
            line(format!("    ... and {} more", files.len() - FILES_SHOWN));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_file_lists_are_truncated() {
        let mut census = TypeCensus::default();
        census.totals.insert("direct_identifier".to_string(), 7);
        census.files_by_type.insert(
            "direct_identifier".to_string(),
            (0..7).map(|i| format!("gdpr/c{i}.yaml")).collect(),
        );
        let text = render(&census);
        assert!(text.contains("Used in 7 files"));
        assert!(text.contains("    - gdpr/c4.yaml"));
        assert!(!text.contains("gdpr/c5.yaml"));
        assert!(text.contains("... and 2 more"));
    }

    #[test]
    fn frequency_lines_are_aligned() {
        let mut census = TypeCensus::default();
        census.totals.insert("special_category".to_string(), 12);
        let text = render(&census);
        assert!(text.contains(&format!("  {:30} : {:4} occurrences", "special_category", 12)));
    }
}
