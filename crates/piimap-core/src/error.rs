//! # Error Types
//!
//! The core crate is almost entirely infallible; the only failure it can
//! report is a record filename that cannot yield a slug.

use thiserror::Error;

/// Error raised by the pure derivation functions in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A record filename cannot be turned into a slug and storage path.
    #[error("invalid record filename {filename:?}: {reason}")]
    InvalidFilename {
        /// The offending filename.
        filename: String,
        /// Why it was rejected.
        reason: String,
    },
}
