//! # piimap-core: Foundational Types for OpenPIIMap
//!
//! The dataset is a tree of YAML records, one per jurisdiction and
//! regulatory framework, describing the legally defined categories of
//! personal information, their sensitivity, masking requirements and
//! supporting legal citations. This crate holds the typed model of those
//! records and the pure functions the pipeline derives state from:
//!
//! - [`status::classify`]: three-level completeness status.
//! - [`slug::resolve`]: stable slug and canonical storage path.
//! - [`region::resolve_region`]: display region from a priority-ordered
//!   keyword table.
//! - [`tags::infer_tags`]: best-effort tag suggestions (non-authoritative).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `piimap-*` crates (this is the leaf of the DAG).
//! - No filesystem access. Everything here is unit-testable with
//!   synthetic inputs.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod index;
pub mod record;
pub mod region;
pub mod slug;
pub mod status;
pub mod tags;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use index::{IndexDocument, IndexEntry, StoredEntry, StoredIndex};
pub use record::{Category, Citation, Record};
pub use region::{resolve_region, RegionRule, REGION_RULES};
pub use slug::{RecordLocation, DATA_PREFIX};
pub use status::{classify, CompletenessStatus};
pub use tags::infer_tags;
