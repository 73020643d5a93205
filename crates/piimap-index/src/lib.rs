//! # piimap-index: The Index Pipeline
//!
//! Filesystem units that derive auxiliary documents from the record tree
//! under `data/`. Records are never modified.
//!
//! - **Builder** ([`builder`]): scans one framework directory, validates
//!   each record, and assembles its `country-index.json`.
//! - **Verify** ([`verify`]): compares stored indexes with freshly built
//!   ones, ignoring `last_updated`.
//! - **Audit** ([`audit`]): checks that every index entry points at a real
//!   file and flags hyphenation drift in directory names.
//! - **Coverage** ([`coverage`]): folds all indexes into one
//!   framework → countries map.
//! - **Census** ([`census`]): tallies category types across the dataset.
//!
//! ## Failure Granularity
//!
//! A bad record is excluded from its group's index and reported. A group
//! with no valid record fails alone. Only a missing data root aborts a run.
//!
//! No unit carries state between invocations, so re-running over an
//! unchanged tree reproduces the same output apart from `last_updated`.

pub mod audit;
pub mod builder;
pub mod census;
pub mod coverage;
pub mod error;
pub mod scan;
pub mod store;
pub mod verify;

pub use audit::{audit, audit_tree, AuditReport, PathViolation, PathViolationKind};
pub use builder::{generation_date, BuildOptions, BuildRun, GroupBuild, GroupFailure, IndexBuilder};
pub use census::{census, TypeCensus};
pub use coverage::{aggregate, collect_indexes, write_coverage, CoverageMap, CoverageRun};
pub use error::{ExcludedRecord, IndexError, IndexResult, RecordIssue};
pub use store::{read_index, read_index_value, read_stored_index, write_index, INDEX_FILENAME};
pub use verify::{compare, verify_against_stored, DriftDetail, DriftOutcome};
