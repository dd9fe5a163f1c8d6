//! Archive scanning and index persistence.

use crate::compare::sort_newest_first;
use crate::error::{ErrorKind, Result};
use crate::landing::LandingPage;
use crate::models::{SimplifiedIndex, VersionIndex, VersionMetadata, VersionRecord};
use crate::{INDEX_FILE, LANDING_FILE, METADATA_FILE, SIMPLIFIED_INDEX_FILE};
use exn::ResultExt;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::instrument;

/// Directory names that are never treated as archived versions.
const IGNORED_DIRECTORIES: &[&str] = &[".git", ".hg", ".svn"];

/// Both index artifacts produced by a single rebuild, in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indexes {
    pub full: VersionIndex,
    pub simplified: SimplifiedIndex,
}
impl From<VersionIndex> for Indexes {
    fn from(full: VersionIndex) -> Self {
        let simplified = SimplifiedIndex::from(&full);
        Self { full, simplified }
    }
}

/// Scans an archive root and maintains its index artifacts.
///
/// Scanning is tolerant: a missing archive root is an empty archive, and a
/// version directory without readable metadata is skipped with a warning.
/// Only [`persist`](Self::persist) can fail, and it does so before the
/// existing artifacts are replaced.
pub struct IndexBuilder {
    root: PathBuf,
    landing: LandingPage,
}
impl IndexBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self { root: root.into(), landing: LandingPage::new()? })
    }

    pub fn with_landing(mut self, landing: LandingPage) -> Self {
        self.landing = landing;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scans the archive root and returns freshly ordered indexes.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn scan(&self) -> Indexes {
        if let Some(previous) = self.previous() {
            tracing::debug!(count = previous.count, "Existing index will be replaced");
        }
        let mut records = self.collect_records();
        sort_newest_first(&mut records);
        let full = VersionIndex::from_sorted(records, OffsetDateTime::now_utc());
        tracing::info!(
            count = full.count,
            latest = full.latest.as_ref().map(VersionRecord::version).unwrap_or("none"),
            "Version index rebuilt"
        );
        full.into()
    }

    /// Scans the archive root, then writes the full index, the simplified
    /// index and the landing page.
    pub fn rebuild(&self) -> Result<Indexes> {
        let indexes = self.scan();
        self.persist(&indexes)?;
        Ok(indexes)
    }

    /// Writes all artifacts into the archive root, creating it if needed.
    ///
    /// Every artifact is rendered before anything is written, and each file
    /// is replaced through a rename so readers never observe a partial file.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn persist(&self, indexes: &Indexes) -> Result<()> {
        let full = to_json(&indexes.full)?;
        let simplified = to_json(&indexes.simplified)?;
        let landing = self.landing.render(&indexes.simplified)?;
        fs::create_dir_all(&self.root).or_raise(|| ErrorKind::Persist(self.root.clone()))?;
        self.write_atomic(INDEX_FILE, full.as_bytes())?;
        self.write_atomic(SIMPLIFIED_INDEX_FILE, simplified.as_bytes())?;
        self.write_atomic(LANDING_FILE, landing.as_bytes())?;
        tracing::debug!("Index artifacts written");
        Ok(())
    }

    /// Loads the currently persisted full index, if there is a readable one.
    pub fn previous(&self) -> Option<VersionIndex> {
        let path = self.root.join(INDEX_FILE);
        let contents = fs::read(&path).ok()?;
        match serde_json::from_slice(&contents) {
            Ok(index) => Some(index),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Existing index is unreadable; starting from empty");
                None
            },
        }
    }

    fn collect_records(&self) -> Vec<VersionRecord> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::info!(error = %e, "Archive root not readable; treating as empty");
                return Vec::new();
            },
        };
        let mut directories: Vec<(String, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                (!IGNORED_DIRECTORIES.contains(&name.as_str())).then(|| (name, entry.path()))
            })
            .collect();
        // read_dir order is platform-dependent; the tie-break for equal
        // versions relies on a stable enumeration order.
        directories.sort_by(|a, b| a.0.cmp(&b.0));
        directories.into_iter().filter_map(|(name, path)| read_record(&name, &path)).collect()
    }

    fn write_atomic(&self, name: &str, contents: &[u8]) -> Result<()> {
        let target = self.root.join(name);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root).or_raise(|| ErrorKind::Persist(target.clone()))?;
        tmp.write_all(contents).or_raise(|| ErrorKind::Persist(target.clone()))?;
        tmp.persist(&target).map_err(|e| e.error).or_raise(|| ErrorKind::Persist(target.clone()))?;
        Ok(())
    }
}

/// Reads the metadata file of a single version directory.
fn read_record(name: &str, directory: &Path) -> Option<VersionRecord> {
    let path = directory.join(METADATA_FILE);
    let contents = match fs::read(&path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(directory = name, error = %e, "Skipping version directory without readable metadata");
            return None;
        },
    };
    match serde_json::from_slice::<VersionMetadata>(&contents) {
        Ok(metadata) => Some(VersionRecord::new(metadata, name)),
        Err(e) => {
            tracing::warn!(directory = name, error = %e, "Skipping version directory with malformed metadata");
            None
        },
    }
}

fn to_json(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).or_raise(|| ErrorKind::Serialize)
}
