//! # Lint Subcommand
//!
//! Maintainer checks beyond the schema. Warnings never fail the run unless
//! `--strict` is given.

use anyhow::Result;
use clap::Args;

use piimap_schema::lint_tree;

use crate::config::PipelineConfig;
use crate::{EXIT_OK, EXIT_VIOLATIONS};

/// Arguments for the `piimap lint` subcommand.
#[derive(Args, Debug, Default)]
pub struct LintArgs {
    /// Treat warnings as failures.
    #[arg(long)]
    pub strict: bool,
}

pub fn run_lint(args: &LintArgs, config: &PipelineConfig) -> Result<u8> {
    piimap_index::scan::ensure_data_root(&config.data_dir)?;
    let report = lint_tree(&config.data_dir);

    for finding in &report.findings {
        println!("{finding}");
    }

    let errors = report.error_count();
    let warnings = report.warning_count();
    println!(
        "Lint: {} file(s), {errors} error(s), {warnings} warning(s)",
        report.files
    );

    if errors > 0 || (args.strict && warnings > 0) {
        Ok(EXIT_VIOLATIONS)
    } else {
        Ok(EXIT_OK)
    }
}
