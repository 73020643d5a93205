//! # Generate-Index Subcommand
//!
//! Builds `country-index.json` for every group (or one), previews it, or
//! verifies the stored copies.
//!
//! ```bash
//! piimap generate-index
//! piimap generate-index --group gdpr --framework-name "GDPR (EU)"
//! piimap generate-index --dry-run
//! piimap generate-index --verify
//! ```
//!
//! `--verify` ignores `last_updated`, so a clean tree verifies on any day.

use anyhow::{Context, Result};
use clap::Args;

use piimap_index::{
    generation_date, verify_against_stored, BuildOptions, BuildRun, DriftOutcome, GroupBuild,
    GroupFailure, IndexBuilder, IndexError,
};
use piimap_schema::SchemaValidator;

use crate::config::PipelineConfig;
use crate::{display_path, EXIT_OK, EXIT_VIOLATIONS};

/// Arguments for the `piimap generate-index` subcommand.
#[derive(Args, Debug, Default)]
pub struct GenerateIndexArgs {
    /// Only process this group directory (e.g. `gdpr`).
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,

    /// Override the framework display name of the group.
    #[arg(long, value_name = "NAME", requires = "group")]
    pub framework_name: Option<String>,

    /// Print the index that would be written instead of writing it.
    #[arg(long, conflicts_with = "verify")]
    pub dry_run: bool,

    /// Compare stored indexes with freshly generated ones; write nothing.
    #[arg(long)]
    pub verify: bool,
}

#[derive(Debug, Default)]
struct Tally {
    done: usize,
    errors: usize,
}

/// Execute the generate-index subcommand.
///
/// Returns exit code: 0 when every group was generated (or verified), 1 if
/// any group failed or drifted.
pub fn run_generate_index(args: &GenerateIndexArgs, config: &PipelineConfig) -> Result<u8> {
    piimap_index::scan::ensure_data_root(&config.data_dir)?;
    let validator = SchemaValidator::builtin().context("failed to compile record schema")?;

    let mut options =
        BuildOptions::new(generation_date()).with_index_filename(config.index_filename.clone());
    if let Some(ref name) = args.framework_name {
        options = options.with_framework(name.clone());
    }
    let builder = IndexBuilder::new(&validator, options);

    let run = match args.group {
        Some(ref group) => build_one(&builder, config, group)?,
        None => builder
            .build_all(&config.data_dir)
            .context("failed to scan data directory")?,
    };

    let mut tally = Tally::default();
    for build in &run.builds {
        report_excluded(build, config);
        if args.verify {
            verify_group(build, config, &mut tally);
        } else if args.dry_run {
            preview_group(build, config, &mut tally)?;
        } else {
            write_group(&builder, build, config, &mut tally);
        }
    }
    for failure in &run.failures {
        report_failure(failure, config);
        tally.errors += 1;
    }

    let label = if args.verify { "Verified" } else { "Generated" };
    println!("\n{label}: {}", tally.done);
    println!("Errors: {}", tally.errors);
    tracing::info!(
        done = tally.done,
        errors = tally.errors,
        excluded = run.excluded_count(),
        "generate-index finished"
    );

    if tally.errors > 0 {
        Ok(EXIT_VIOLATIONS)
    } else {
        Ok(EXIT_OK)
    }
}

// A missing group directory is fatal for a `--group` run; an empty group
// is an ordinary per-group failure.
fn build_one(builder: &IndexBuilder<'_>, config: &PipelineConfig, group: &str) -> Result<BuildRun> {
    let group_dir = config.data_dir.join(group);
    let mut run = BuildRun::default();
    match builder.build_group(&group_dir) {
        Ok(build) => run.builds.push(build),
        Err(e @ IndexError::GroupNotFound { .. }) => return Err(e.into()),
        Err(error) => run.failures.push(GroupFailure {
            directory: group_dir,
            error,
        }),
    }
    Ok(run)
}

fn report_excluded(build: &GroupBuild, config: &PipelineConfig) {
    for excluded in &build.excluded {
        println!(
            "  WARN: excluded {}: {}",
            display_path(&excluded.path, &config.repo_root),
            excluded.issue
        );
    }
}

fn report_failure(failure: &GroupFailure, config: &PipelineConfig) {
    println!(
        "FAIL: {}: {}",
        display_path(&failure.directory, &config.repo_root),
        failure.error
    );
    if let IndexError::GroupEmpty { excluded, .. } = &failure.error {
        for record in excluded {
            println!(
                "    - {}: {}",
                display_path(&record.path, &config.repo_root),
                record.issue
            );
        }
    }
}

fn verify_group(build: &GroupBuild, config: &PipelineConfig, tally: &mut Tally) {
    let stored = build.index_path(&config.index_filename);
    let shown = display_path(&stored, &config.repo_root);
    match verify_against_stored(&stored, &build.document) {
        DriftOutcome::Match => {
            println!("OK: {shown} ({} entries)", build.document.countries.len());
            tally.done += 1;
        }
        DriftOutcome::Missing => {
            println!("FAIL: {shown}: no stored index");
            tally.errors += 1;
        }
        DriftOutcome::Unreadable(reason) => {
            println!("FAIL: {shown}: {reason}");
            tally.errors += 1;
        }
        DriftOutcome::Differs(detail) => {
            println!("FAIL: {shown}: out of date ({detail})");
            tally.errors += 1;
        }
    }
}

fn preview_group(build: &GroupBuild, config: &PipelineConfig, tally: &mut Tally) -> Result<()> {
    let target = build.index_path(&config.index_filename);
    let json = build
        .document
        .to_pretty_json()
        .context("failed to serialize index document")?;
    println!("--- {} (dry run) ---", display_path(&target, &config.repo_root));
    print!("{json}");
    tally.done += 1;
    Ok(())
}

fn write_group(builder: &IndexBuilder<'_>, build: &GroupBuild, config: &PipelineConfig, tally: &mut Tally) {
    match builder.write(build) {
        Ok(path) => {
            println!(
                "OK: {} ({} entries, region {})",
                display_path(&path, &config.repo_root),
                build.document.countries.len(),
                build.document.region
            );
            tally.done += 1;
        }
        Err(e) => {
            println!("FAIL: {}: {e}", build.group);
            tally.errors += 1;
        }
    }
}
