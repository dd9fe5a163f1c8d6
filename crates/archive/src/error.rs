//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Every precondition ([`ErrorKind::MissingBuildDir`],
//! [`ErrorKind::InvalidVersion`], [`ErrorKind::AlreadyArchived`]) is checked
//! before anything is written, so a failed run leaves the archive untouched.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The build output to archive doesn't exist.
    #[display("build directory not found: {}", _0.display())]
    MissingBuildDir(#[error(not(source))] PathBuf),
    /// The clean version can't be used as a version directory name.
    #[display("not a valid version directory name: {_0}")]
    InvalidVersion(#[error(not(source))] String),
    /// The version is already archived; pass `force` to replace it.
    #[display("version {_0} is already archived; use --force to replace it")]
    AlreadyArchived(#[error(not(source))] String),
    /// Reading or writing a file in the build or archive directory failed.
    #[display("I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// Version metadata could not be produced.
    #[display("unable to write version metadata")]
    Metadata,
    /// The injector script template failed to compile or render.
    #[display("issue rendering injector script template")]
    Template,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
