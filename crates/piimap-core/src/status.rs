//! # Completeness Status
//!
//! Derived (never authored) classification of how complete a record is,
//! computed from its category count and citation coverage:
//!
//! | categories | citation coverage | status        |
//! |------------|-------------------|---------------|
//! | `>= 10`    | `>= 80%`          | `complete`    |
//! | `>= 10`    | `< 80%`           | `in-progress` |
//! | `5..=9`    | any               | `in-progress` |
//! | `< 5`      | any               | `draft`       |
//!
//! The result depends only on the two counts, so category order is
//! irrelevant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Category;

/// Minimum category count for a record to be considered `complete`.
pub const COMPLETE_MIN_CATEGORIES: usize = 10;

/// Minimum category count for a record to leave `draft`.
pub const IN_PROGRESS_MIN_CATEGORIES: usize = 5;

/// Citation coverage threshold for `complete`, as the fraction 4/5.
const COVERAGE_NUMERATOR: usize = 4;
const COVERAGE_DENOMINATOR: usize = 5;

/// Three-level completeness of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletenessStatus {
    Draft,
    InProgress,
    Complete,
}

impl CompletenessStatus {
    /// The serialized form used in index documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in-progress",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for CompletenessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fraction of categories with a non-empty citation list (0 when empty).
pub fn citation_ratio(categories: &[Category]) -> f64 {
    if categories.is_empty() {
        return 0.0;
    }
    let cited = categories.iter().filter(|c| c.has_citations()).count();
    cited as f64 / categories.len() as f64
}

/// Classify a record's category list.
pub fn classify(categories: &[Category]) -> CompletenessStatus {
    let cited = categories.iter().filter(|c| c.has_citations()).count();
    classify_counts(categories.len(), cited)
}

/// Classify from raw counts: `total` categories of which `cited` carry
/// citations.
///
/// The 80% threshold is compared in integers (`cited / total >= 4 / 5`)
/// so the boundary is exact.
pub fn classify_counts(total: usize, cited: usize) -> CompletenessStatus {
    if total >= COMPLETE_MIN_CATEGORIES {
        if cited * COVERAGE_DENOMINATOR >= total * COVERAGE_NUMERATOR {
            CompletenessStatus::Complete
        } else {
            CompletenessStatus::InProgress
        }
    } else if total >= IN_PROGRESS_MIN_CATEGORIES {
        CompletenessStatus::InProgress
    } else {
        CompletenessStatus::Draft
    }
}
