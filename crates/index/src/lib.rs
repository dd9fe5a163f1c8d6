//! Version archive indexing.
//!
//! An archive root holds one directory per archived build, each containing a
//! [`METADATA_FILE`]. This crate scans those directories, orders them newest
//! first and writes three artifacts next to them:
//!
//! - [`INDEX_FILE`]: the full [`VersionIndex`](models::VersionIndex),
//! - [`SIMPLIFIED_INDEX_FILE`]: the [`SimplifiedIndex`](models::SimplifiedIndex)
//!   fetched by the version switcher,
//! - [`LANDING_FILE`]: a landing page listing every version.
//!
//! It also owns the [`segment`] convention shared by everything that names or
//! detects version directories.

mod builder;
mod compare;
pub mod error;
mod landing;
pub mod models;
pub mod segment;

use crate::error::Result;
use crate::models::{SimplifiedIndex, VersionIndex};
use std::path::Path;
use tracing::instrument;

pub use crate::builder::{IndexBuilder, Indexes};
pub use crate::compare::{newest_first, semantic, sort_newest_first};
pub use crate::landing::LandingPage;

/// Per-version metadata file, inside each version directory.
pub const METADATA_FILE: &str = "version-metadata.json";
/// Full index, in the archive root.
pub const INDEX_FILE: &str = "index.json";
/// Simplified index, in the archive root.
pub const SIMPLIFIED_INDEX_FILE: &str = "versions.json";
/// Landing page, in the archive root.
pub const LANDING_FILE: &str = "index.html";

/// Easy, top-level entrypoint: rescans `root` and replaces its index
/// artifacts.
///
/// A missing root yields empty indexes (and creates the root to hold them).
/// Version directories with missing or malformed metadata are skipped.
#[instrument(skip_all, fields(root = %root.as_ref().display()))]
pub fn rebuild_index(root: impl AsRef<Path>) -> Result<(VersionIndex, SimplifiedIndex)> {
    let Indexes { full, simplified } = IndexBuilder::new(root.as_ref())?.rebuild()?;
    Ok((full, simplified))
}
