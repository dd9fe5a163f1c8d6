//! Where the switcher loads its catalog from.
//!
//! A [`CatalogSource`] yields a [`SimplifiedIndex`]. Sources are tried in
//! order by [`Switcher::load_catalog`](crate::Switcher::load_catalog); the
//! first that succeeds provides the catalog.

mod file;
mod fixed;

pub use self::file::FileSource;
pub use self::fixed::StaticSource;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use verstage_index::models::SimplifiedIndex;

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable description of the source, for logging.
    fn name(&self) -> &str;

    async fn load(&self) -> Result<SimplifiedIndex>;
}

pub type SourceHandle = Arc<dyn CatalogSource + Send + Sync>;
