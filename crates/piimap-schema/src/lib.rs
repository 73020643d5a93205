//! # piimap-schema: Record Validation
//!
//! Strict structural validation of jurisdiction records, plus the loader
//! that turns YAML files into JSON values and the warning-level lint pass.
//!
//! ## Runtime Validation (`validate`)
//!
//! [`SchemaValidator`] compiles the embedded `record.schema.json`
//! (Draft 2020-12) once and validates JSON values against it, collecting
//! every violation in one pass rather than stopping at the first. Each
//! violation carries the instance location, the failing keyword, the schema
//! location and a message.
//!
//! ## Loading (`loader`)
//!
//! Records are YAML. The loader parses them with `serde_yaml` and converts
//! the tree to `serde_json::Value` so the same value can be schema-checked
//! and then deserialized into [`piimap_core::Record`]. YAML dates are kept
//! as strings.
//!
//! ## Linting (`lint`)
//!
//! Key ordering, missing tags and citation sources, reported as findings
//! with a severity. Linting never blocks validation.
//!
//! ## Crate Policy
//!
//! - Depends only on `piimap-core` internally.
//! - Schema validation is pure: it never writes to disk or mutates input.

pub mod lint;
pub mod loader;
pub mod validate;

pub use lint::{lint_file, lint_tree, LintFinding, LintReport, LintRule, LintSeverity};
pub use loader::{find_record_files, load_record_value, load_record_yaml, LoadError};
pub use validate::{
    RecordFailure, SchemaValidationError, SchemaValidator, SchemaViolation, ValidationReport,
};
