use super::VersionRecord;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The full, persisted version index (`index.json`).
///
/// `versions` is ordered newest first; `latest` is always a copy of the first
/// element, or `None` for an empty archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionIndex {
    pub versions: Vec<VersionRecord>,
    pub latest: Option<VersionRecord>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated: OffsetDateTime,
    pub count: usize,
}
impl VersionIndex {
    /// Builds an index from records that are already sorted newest first.
    pub fn from_sorted(versions: Vec<VersionRecord>, updated: OffsetDateTime) -> Self {
        let latest = versions.first().cloned();
        let count = versions.len();
        Self { versions, latest, updated, count }
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// A catalog entry in the simplified index: just enough to render and
/// navigate, without commit hashes or timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub version: String,
    pub clean_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_date: Option<String>,
    pub path: String,
}
impl From<&VersionRecord> for CatalogEntry {
    fn from(record: &VersionRecord) -> Self {
        Self {
            version: record.metadata.version.clone(),
            clean_version: record.metadata.clean_version.clone(),
            build_date: Some(record.metadata.build_date.clone()),
            path: record.path.clone(),
        }
    }
}

/// Reduced shape of the latest entry in the simplified index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestEntry {
    pub version: String,
    pub clean_version: String,
    pub path: String,
}
impl From<&VersionRecord> for LatestEntry {
    fn from(record: &VersionRecord) -> Self {
        Self {
            version: record.metadata.version.clone(),
            clean_version: record.metadata.clean_version.clone(),
            path: record.path.clone(),
        }
    }
}
impl From<&CatalogEntry> for LatestEntry {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            version: entry.version.clone(),
            clean_version: entry.clean_version.clone(),
            path: entry.path.clone(),
        }
    }
}

/// The simplified index (`versions.json`) fetched by the version switcher.
///
/// This is the only contract between the index builder and the switcher.
/// Missing fields are tolerated on read so that hand-written or truncated
/// catalogs still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedIndex {
    #[serde(default)]
    pub versions: Vec<CatalogEntry>,
    #[serde(default)]
    pub latest: Option<LatestEntry>,
    #[serde(default)]
    pub count: usize,
}
impl From<&VersionIndex> for SimplifiedIndex {
    fn from(index: &VersionIndex) -> Self {
        Self {
            versions: index.versions.iter().map(CatalogEntry::from).collect(),
            latest: index.latest.as_ref().map(LatestEntry::from),
            count: index.count,
        }
    }
}
impl SimplifiedIndex {
    /// Builds a catalog from entries, deriving `latest` and `count`.
    pub fn from_entries(versions: Vec<CatalogEntry>) -> Self {
        let latest = versions.first().map(LatestEntry::from);
        let count = versions.len();
        Self { versions, latest, count }
    }

    /// Clean version of the latest entry, falling back to the first listed
    /// entry when `latest` was omitted.
    pub fn latest_clean_version(&self) -> Option<&str> {
        self.latest
            .as_ref()
            .map(|l| l.clean_version.as_str())
            .or_else(|| self.versions.first().map(|v| v.clean_version.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
