//! # piimap CLI entry point
//!
//! Parses command-line arguments, resolves the pipeline configuration and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use piimap_cli::audit_paths::{run_audit_paths, AuditPathsArgs};
use piimap_cli::audit_types::{run_audit_types, AuditTypesArgs};
use piimap_cli::config::{ConfigOverrides, PipelineConfig};
use piimap_cli::coverage::{run_coverage, CoverageArgs};
use piimap_cli::generate_index::{run_generate_index, GenerateIndexArgs};
use piimap_cli::lint::{run_lint, LintArgs};
use piimap_cli::validate::{run_validate, ValidateArgs};
use piimap_cli::{resolve_repo_root, EXIT_FATAL};

/// OpenPIIMap dataset tooling.
///
/// Validates jurisdiction records, generates and verifies per-framework
/// country indexes, audits index paths, and aggregates coverage.
#[derive(Parser, Debug)]
#[command(name = "piimap", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset root (defaults to `data/` at the repository root).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate records against the record schema.
    Validate(ValidateArgs),

    /// Check field order, tags and citation authority.
    Lint(LintArgs),

    /// Generate, preview or verify country-index.json files.
    GenerateIndex(GenerateIndexArgs),

    /// Check that every index entry points at an existing record.
    AuditPaths(AuditPathsArgs),

    /// Write the framework → countries coverage map.
    Coverage(CoverageArgs),

    /// Report category type usage across the dataset.
    AuditTypes(AuditTypesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let repo_root = resolve_repo_root(&cwd).unwrap_or_else(|| {
        tracing::warn!("Could not locate repository root; using current directory");
        cwd.clone()
    });
    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let overrides = ConfigOverrides {
        data_dir: cli.data_dir,
    };
    let config = match PipelineConfig::load(&repo_root, &overrides, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(EXIT_FATAL);
        }
    };

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::Lint(args) => run_lint(&args, &config),
        Commands::GenerateIndex(args) => run_generate_index(&args, &config),
        Commands::AuditPaths(args) => run_audit_paths(&args, &config),
        Commands::Coverage(args) => run_coverage(&args, &config),
        Commands::AuditTypes(args) => run_audit_types(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
