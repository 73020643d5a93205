//! # Audit-Paths Subcommand
//!
//! Reports index entries whose file is missing, whose directory name has
//! drifted in hyphenation, or which carry no path. Nothing is repaired.

use anyhow::Result;
use clap::Args;

use piimap_index::audit_tree;

use crate::config::PipelineConfig;
use crate::{display_path, EXIT_OK, EXIT_VIOLATIONS};

/// Arguments for the `piimap audit-paths` subcommand.
#[derive(Args, Debug, Default)]
pub struct AuditPathsArgs {}

pub fn run_audit_paths(_args: &AuditPathsArgs, config: &PipelineConfig) -> Result<u8> {
    let report = audit_tree(&config.data_dir, &config.index_filename)?;

    for v in &report.violations {
        let mut line = format!(
            "FAIL: {} [{}]",
            display_path(&v.index, &config.repo_root),
            v.kind
        );
        if let Some(name) = &v.entry {
            line.push_str(&format!(" {name}"));
        }
        if !v.path.is_empty() {
            line.push_str(&format!(" '{}'", v.path));
        }
        println!("{line}: {}", v.detail);
    }

    println!(
        "Audited {} index file(s), {} entries: {} violation(s)",
        report.indexes,
        report.entries,
        report.violations.len()
    );

    if report.is_clean() {
        Ok(EXIT_OK)
    } else {
        Ok(EXIT_VIOLATIONS)
    }
}
