//! # Record Model
//!
//! Typed view of a single YAML record: one jurisdiction's treatment of a
//! regulatory framework. Records are human-authored and read-only to the
//! pipeline; these types only ever deserialize them.
//!
//! Structural rules (required fields, the citation disjunction) are
//! enforced by the schema validator before a value is converted into a
//! [`Record`], so deserialization here is deliberately lenient about
//! optional fields.

use serde::{Deserialize, Serialize};

/// A single legal reference supporting a category.
///
/// At least one of `regulation`, `national_law` or `authority` must be
/// present for the citation to be valid; see
/// [`Citation::has_legal_source`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_law: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guideline: Option<String>,
}

impl Citation {
    /// Whether the citation names a regulation, national law or authority.
    pub fn has_legal_source(&self) -> bool {
        self.regulation.is_some() || self.national_law.is_some() || self.authority.is_some()
    }
}

/// One legally defined kind of personal data within a framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Classification such as `direct_identifier` or `special_category`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub required_masking: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

impl Category {
    /// A category with no citations can never make a record complete.
    pub fn has_citations(&self) -> bool {
        !self.citations.is_empty()
    }
}

/// A jurisdiction's categorized privacy-law metadata document.
///
/// `status` is the maintainer's free-text status and is unrelated to the
/// derived [`CompletenessStatus`](crate::CompletenessStatus).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub country: String,
    pub framework: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    pub categories: Vec<Category>,
}

impl Record {
    /// Number of categories carrying at least one citation.
    pub fn cited_category_count(&self) -> usize {
        self.categories.iter().filter(|c| c.has_citations()).count()
    }
}
