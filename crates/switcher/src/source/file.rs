use super::CatalogSource;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use verstage_index::models::SimplifiedIndex;

/// Reads a simplified index from the local filesystem.
///
/// Relative catalog locations such as `../versions.json` are resolved against
/// the directory the source was created for, mirroring how a browser resolves
/// them against the current page.
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self { name: path.display().to_string(), path }
    }

    /// Resolves a catalog `location` the way a page served from `directory`
    /// inside `site_root` would: absolute locations start at `site_root`,
    /// relative ones at `directory`.
    pub fn resolve(site_root: &Path, directory: &Path, location: &str) -> Self {
        let path = match location.strip_prefix('/') {
            Some(absolute) => site_root.join(absolute),
            None => directory.join(location),
        };
        Self { name: location.to_string(), path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<SimplifiedIndex> {
        let data = tokio::fs::read(&self.path).await.or_raise(|| ErrorKind::Io(self.path.clone()))?;
        serde_json::from_slice(&data).or_raise(|| ErrorKind::Parse(self.name.clone()))
    }
}
