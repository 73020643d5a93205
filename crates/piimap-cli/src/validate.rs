//! # Validate Subcommand
//!
//! Schema validation of jurisdiction records. Every record under the data
//! directory is checked unless a single file is given. Violations are
//! reported per record; the run never stops at the first failure.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use piimap_schema::{SchemaValidationError, SchemaValidator};

use crate::config::PipelineConfig;
use crate::{display_path, resolve_path, EXIT_OK, EXIT_VIOLATIONS};

/// Arguments for the `piimap validate` subcommand.
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Validate a single record file instead of the whole data directory.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every record is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, config: &PipelineConfig) -> Result<u8> {
    let validator = SchemaValidator::builtin().context("failed to compile record schema")?;
    tracing::info!(schema = validator.schema_id(), "loaded record schema");

    if let Some(ref path) = args.path {
        let resolved = resolve_path(path, &config.repo_root);
        return Ok(validate_single_path(&validator, &resolved, &config.repo_root));
    }

    piimap_index::scan::ensure_data_root(&config.data_dir)?;
    let report = validator.validate_tree(&config.data_dir);

    for failure in &report.failures {
        println!(
            "  FAIL: {}",
            display_path(&failure.path, &config.repo_root)
        );
        print_error_details(&failure.error);
    }

    println!("Records: {}/{} passed", report.passed, report.total);
    if !report.is_clean() {
        println!(
            "\n{} record(s) failed validation out of {} total.",
            report.failed(),
            report.total
        );
        return Ok(EXIT_VIOLATIONS);
    }
    Ok(EXIT_OK)
}

fn validate_single_path(validator: &SchemaValidator, path: &Path, repo_root: &Path) -> u8 {
    match validator.validate_file(path) {
        Ok(_) => {
            println!("OK: {}", display_path(path, repo_root));
            EXIT_OK
        }
        Err(e) => {
            println!("FAIL: {}", display_path(path, repo_root));
            print_error_details(&e);
            EXIT_VIOLATIONS
        }
    }
}

fn print_error_details(error: &SchemaValidationError) {
    let violations = error.violations();
    if violations.is_empty() {
        println!("    - {error}");
    }
    for violation in violations {
        println!("    - {violation}");
    }
}
