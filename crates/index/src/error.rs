//! Index Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Scanning never produces an error: unreadable version directories are
//! skipped and logged. Only writing the index artifacts can fail.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// An index artifact could not be written to the archive root.
    #[display("unable to write index artifact: {}", _0.display())]
    Persist(#[error(not(source))] PathBuf),
    /// The index could not be serialized to JSON.
    #[display("unable to serialize index")]
    Serialize,
    /// The landing page template failed to compile or render.
    #[display("issue rendering landing page template")]
    Template,
    /// An embedded template was not found.
    #[display("template asset not found: {_0}")]
    AssetNotFound(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persist(_))
    }
}
