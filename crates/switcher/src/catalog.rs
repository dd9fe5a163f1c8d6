use crate::context::Context;
use crate::resolve::UNKNOWN_VERSION;
use crate::source::SourceHandle;
use verstage_index::models::{CatalogEntry, SimplifiedIndex};

/// Where the catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Loaded from the named source.
    Loaded(String),
    /// Every source failed; the catalog holds a single entry for the current
    /// page.
    Unavailable,
}

/// The versions a switcher offers, in index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub index: SimplifiedIndex,
    pub origin: Origin,
}

impl Catalog {
    /// Tries every source in order, falling back to [`Catalog::synthetic`].
    pub async fn load(sources: &[SourceHandle], context: &Context) -> Self {
        for source in sources {
            match source.load().await {
                Ok(index) => {
                    tracing::debug!(source = source.name(), versions = index.versions.len(), "Loaded version catalog");
                    return Self { index, origin: Origin::Loaded(source.name().to_string()) };
                },
                Err(e) => tracing::warn!(source = source.name(), error = ?e, "Unable to load version catalog"),
            }
        }
        tracing::warn!("No version catalog available; offering the current page only");
        Self::synthetic(context)
    }

    /// A single-entry catalog standing for the page being viewed, so that
    /// selecting it is always a no-op.
    pub fn synthetic(context: &Context) -> Self {
        let version = context.version_hint().unwrap_or(UNKNOWN_VERSION).to_string();
        let entry = CatalogEntry {
            version: version.clone(),
            clean_version: version.clone(),
            build_date: None,
            path: version,
        };
        Self { index: SimplifiedIndex::from_entries(vec![entry]), origin: Origin::Unavailable }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.index.versions
    }

    pub fn latest(&self) -> Option<&str> {
        self.index.latest_clean_version()
    }

    pub fn find(&self, clean_version: &str) -> Option<&CatalogEntry> {
        self.entries().iter().find(|e| e.clean_version == clean_version)
    }

    pub fn is_available(&self) -> bool {
        matches!(self.origin, Origin::Loaded(_))
    }
}
