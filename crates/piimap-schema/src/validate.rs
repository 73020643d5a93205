//! # Record Schema Validation
//!
//! Validates jurisdiction records against the embedded
//! `schemas/record.schema.json` (Draft 2020-12).
//!
//! ## Contract
//!
//! - A record needs non-empty `country` and `framework` strings and a
//!   `categories` array (possibly empty).
//! - Each category needs `name`, `type`, a boolean `required_masking` and a
//!   `citations` array (possibly empty). `tags`, when present, must be an
//!   array of strings.
//! - Each citation must name at least one of `regulation`, `national_law`
//!   or `authority`.
//!
//! Every violation is collected, so a maintainer sees all problems of a
//! file in a single run.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use crate::loader::{self, LoadError};

/// Embedded record schema.
const RECORD_SCHEMA: &str = include_str!("../schemas/record.schema.json");

/// Identifier used when the schema carries no `$id`.
const FALLBACK_SCHEMA_ID: &str = "record.schema.json";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A single structural violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON Pointer to the violating value (empty for the document root).
    pub instance_path: String,
    /// The schema keyword that failed, e.g. `required`, `type`, `anyOf`.
    pub rule: String,
    /// JSON Pointer into the schema that produced the violation.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "{location} [{}]: {}", self.rule, self.message)
    }
}

/// Errors returned by schema validation operations.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The record file could not be loaded.
    #[error("failed to load document {path}: {reason}")]
    DocumentLoadError {
        /// Path to the document that failed to load.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The schema could not be parsed or compiled into a validator.
    #[error("failed to compile schema {schema_id}: {reason}")]
    SchemaCompileError {
        /// The schema `$id` or path.
        schema_id: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The document failed validation.
    #[error("{count} schema violation(s) in {document}")]
    ValidationFailed {
        /// The document that was checked (path or `<value>`).
        document: String,
        /// Number of violations found.
        count: usize,
        /// Individual violations.
        details: Vec<SchemaViolation>,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaValidationError {
    /// The violations carried by a `ValidationFailed` error.
    pub fn violations(&self) -> &[SchemaViolation] {
        match self {
            Self::ValidationFailed { details, .. } => details,
            _ => &[],
        }
    }
}

impl From<LoadError> for SchemaValidationError {
    fn from(e: LoadError) -> Self {
        let path = match &e {
            LoadError::FileNotFound { path }
            | LoadError::Io { path, .. }
            | LoadError::YamlParse { path, .. }
            | LoadError::NotAMapping { path }
            | LoadError::JsonIncompatible { path, .. } => path.display().to_string(),
        };
        Self::DocumentLoadError {
            path,
            reason: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SchemaValidator
// ---------------------------------------------------------------------------

/// A compiled validator for jurisdiction records.
pub struct SchemaValidator {
    schema_id: String,
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_id", &self.schema_id)
            .finish()
    }
}

impl SchemaValidator {
    /// Compile the embedded record schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::SchemaCompileError`] if the embedded
    /// schema is not valid JSON or not a valid JSON Schema.
    pub fn builtin() -> Result<Self, SchemaValidationError> {
        let schema: Value = serde_json::from_str(RECORD_SCHEMA).map_err(|e| {
            SchemaValidationError::SchemaCompileError {
                schema_id: FALLBACK_SCHEMA_ID.to_string(),
                reason: format!("invalid JSON: {e}"),
            }
        })?;
        Self::from_schema(&schema)
    }

    /// Compile an arbitrary schema value.
    pub fn from_schema(schema: &Value) -> Result<Self, SchemaValidationError> {
        let schema_id = schema
            .get("$id")
            .and_then(|v| v.as_str())
            .unwrap_or(FALLBACK_SCHEMA_ID)
            .to_string();

        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(schema)
            .map_err(|e| SchemaValidationError::SchemaCompileError {
                schema_id: schema_id.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            schema_id,
            validator,
        })
    }

    /// The `$id` of the compiled schema.
    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    /// Collect every violation of `value`, in schema traversal order.
    pub fn violations(&self, value: &Value) -> Vec<SchemaViolation> {
        self.validator
            .iter_errors(value)
            .map(|err| {
                let schema_path = err.schema_path.to_string();
                let rule = schema_path
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string();
                SchemaViolation {
                    instance_path: err.instance_path.to_string(),
                    rule,
                    schema_path,
                    message: err.to_string(),
                }
            })
            .collect()
    }

    /// Validate a parsed value.
    ///
    /// Returns `Ok(())` if the value is valid, or
    /// [`SchemaValidationError::ValidationFailed`] with all violations.
    pub fn validate_value(&self, value: &Value) -> Result<(), SchemaValidationError> {
        self.check(value, "<value>")
    }

    /// Load a YAML record and validate it, returning the parsed value on
    /// success so callers can deserialize it without re-reading the file.
    pub fn validate_file(&self, path: &Path) -> Result<Value, SchemaValidationError> {
        let value = loader::load_record_value(path)?;
        self.check(&value, &path.display().to_string())?;
        Ok(value)
    }

    /// Validate every record file found under `data_dir`.
    pub fn validate_tree(&self, data_dir: &Path) -> ValidationReport {
        let files = loader::find_record_files(data_dir);
        let total = files.len();
        let mut passed = 0usize;
        let mut failures = Vec::new();

        for path in files {
            match self.validate_file(&path) {
                Ok(_) => {
                    tracing::debug!(path = %path.display(), "record passed schema validation");
                    passed += 1;
                }
                Err(error) => {
                    tracing::debug!(path = %path.display(), %error, "record failed schema validation");
                    failures.push(RecordFailure { path, error });
                }
            }
        }

        ValidationReport {
            total,
            passed,
            failures,
        }
    }

    fn check(&self, value: &Value, document: &str) -> Result<(), SchemaValidationError> {
        let details = self.violations(value);
        if details.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                document: document.to_string(),
                count: details.len(),
                details,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Validation report types
// ---------------------------------------------------------------------------

/// Result of validating every record in a data tree.
#[derive(Debug)]
pub struct ValidationReport {
    /// Number of record files found.
    pub total: usize,
    /// Number that passed validation.
    pub passed: usize,
    /// Details of each failure.
    pub failures: Vec<RecordFailure>,
}

impl ValidationReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A record that could not be loaded or failed validation.
#[derive(Debug)]
pub struct RecordFailure {
    pub path: PathBuf,
    pub error: SchemaValidationError,
}
