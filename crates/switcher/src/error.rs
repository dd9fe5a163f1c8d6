//! Switcher Error Types
//!
//! Loading a catalog never fails from the caller's point of view: source
//! errors are logged and the switcher falls back to a synthetic catalog.
//! The kinds below surface from individual [`CatalogSource`]s, from the
//! [`Host`] while navigating, and from misuse of the state machine.
//!
//! [`CatalogSource`]: crate::CatalogSource
//! [`Host`]: crate::Host

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A switcher error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for switcher operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A catalog file could not be read.
    #[display("unable to read catalog: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// A catalog was read but isn't a simplified index.
    #[display("catalog is not a valid version index: {_0}")]
    Parse(#[error(not(source))] String),
    /// The catalog source has nothing to offer.
    #[display("catalog source unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
    /// The page already has a switcher.
    #[display("a version switcher is already mounted on this page")]
    AlreadyMounted,
    /// The switcher has not loaded its catalog yet, or has already left the
    /// page.
    #[display("version switcher is not ready")]
    NotReady,
    /// The selected version isn't in the catalog.
    #[display("unknown version: {_0}")]
    UnknownVersion(#[error(not(source))] String),
    /// The host refused to navigate.
    #[display("unable to navigate to {_0}")]
    Navigation(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Unavailable(_))
    }
}
