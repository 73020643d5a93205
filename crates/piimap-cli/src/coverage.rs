//! # Coverage Subcommand
//!
//! Folds every stored index into the framework → countries map consumed by
//! the website.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use piimap_index::{collect_indexes, write_coverage};

use crate::config::PipelineConfig;
use crate::{display_path, resolve_path, EXIT_OK, EXIT_VIOLATIONS};

/// Arguments for the `piimap coverage` subcommand.
#[derive(Args, Debug, Default)]
pub struct CoverageArgs {
    /// Output path (defaults to `coverage.json` at the repository root).
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Execute the coverage subcommand.
///
/// Unreadable indexes are skipped and reported; the map is written from
/// the rest and the exit code is 1.
pub fn run_coverage(args: &CoverageArgs, config: &PipelineConfig) -> Result<u8> {
    let out = args
        .out
        .as_ref()
        .map(|p| resolve_path(p, &config.repo_root))
        .unwrap_or_else(|| config.coverage_path.clone());

    let run = collect_indexes(&config.data_dir, &config.index_filename)?;
    for (path, error) in &run.failures {
        println!("WARN: skipped {}: {error}", display_path(path, &config.repo_root));
    }

    let coverage = run.coverage();
    write_coverage(&out, &coverage)
        .with_context(|| format!("failed to write coverage map to {}", out.display()))?;

    let countries: usize = coverage.values().map(Vec::len).sum();
    println!(
        "Wrote {} framework(s), {countries} country entries to {}",
        coverage.len(),
        display_path(&out, &config.repo_root)
    );

    if run.failures.is_empty() {
        Ok(EXIT_OK)
    } else {
        Ok(EXIT_VIOLATIONS)
    }
}
