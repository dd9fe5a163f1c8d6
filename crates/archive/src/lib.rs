//! Archiving build outputs.
//!
//! An [`Archiver`] copies a build directory into
//! `<archive root>/<clean version>/`, stamps it with a
//! [`METADATA_FILE`](verstage_index::METADATA_FILE), makes absolute asset
//! references relative and drops an [`INJECTOR_FILE`] next to them.
//!
//! The version directory is named by [`verstage_index::segment`], the same
//! convention the switcher uses to detect versions in URLs. Every fatal
//! precondition is checked before the archive is touched, and a new copy is
//! assembled in a staging directory under the archive root before being
//! renamed into place, so a failed run never loses an existing version.

mod copy;
pub mod error;
mod injector;
mod metadata;
mod rewrite;

use crate::error::{ErrorKind, Result};
use crate::injector::Injector;
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;
use verstage_index::METADATA_FILE;
use verstage_index::models::VersionMetadata;
use verstage_index::segment;

pub use crate::rewrite::Rewritten;

/// Script written into every version directory.
pub const INJECTOR_FILE: &str = "version-injector.js";

/// Names never copied out of a build directory unless overridden.
pub const DEFAULT_EXCLUDE: &[&str] =
    &["archive", "node_modules", ".git", ".github", ".version-archive-tools", "dist", "build"];

/// The result of a successful archive run.
#[derive(Debug, Clone)]
pub struct Archived {
    /// The new version directory.
    pub directory: PathBuf,
    pub metadata: VersionMetadata,
    /// Files copied from the build directory.
    pub files: usize,
    /// Whether an existing archive of the same version was replaced.
    pub replaced: bool,
    pub rewritten: Rewritten,
}

#[derive(Debug, Clone)]
pub struct Archiver {
    root: PathBuf,
    exclude: Vec<String>,
    force: bool,
    path_prefix: Option<String>,
    rewrite: bool,
    inject: bool,
    commit: Option<String>,
}
impl Archiver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: DEFAULT_EXCLUDE.iter().map(|e| e.to_string()).collect(),
            force: false,
            path_prefix: None,
            rewrite: true,
            inject: true,
            commit: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Replace an already archived version instead of refusing.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_exclude(mut self, exclude: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    /// Rewrite this absolute prefix (`/my-project/`) instead of detecting
    /// prefixes from the archived HTML.
    pub fn with_path_prefix(mut self, prefix: Option<impl Into<String>>) -> Self {
        self.path_prefix = prefix.map(Into::into);
        self
    }

    pub fn with_rewrite(mut self, rewrite: bool) -> Self {
        self.rewrite = rewrite;
        self
    }

    pub fn with_inject(mut self, inject: bool) -> Self {
        self.inject = inject;
        self
    }

    pub fn with_commit(mut self, commit: Option<impl Into<String>>) -> Self {
        self.commit = commit.map(Into::into);
        self
    }

    /// Archives `build_dir` as `version`.
    ///
    /// `clean_version` defaults to `version` without its `v` prefix and must
    /// be version-shaped; it names the version directory.
    ///
    /// # Errors
    /// [`ErrorKind::MissingBuildDir`], [`ErrorKind::InvalidVersion`] and
    /// [`ErrorKind::AlreadyArchived`] are raised before anything is written.
    #[instrument(skip(self, build_dir), fields(root = %self.root.display(), build = %build_dir.as_ref().display()))]
    pub fn archive(&self, version: &str, clean_version: Option<&str>, build_dir: impl AsRef<Path>) -> Result<Archived> {
        let build_dir = build_dir.as_ref();
        if !build_dir.is_dir() {
            exn::bail!(ErrorKind::MissingBuildDir(build_dir.to_path_buf()));
        }
        let requested = clean_version.unwrap_or(version).trim();
        let Some(clean_version) = segment::parse(requested) else {
            exn::bail!(ErrorKind::InvalidVersion(requested.to_string()));
        };
        let directory = self.root.join(clean_version);
        let replaced = directory.exists();
        if replaced && !self.force {
            exn::bail!(ErrorKind::AlreadyArchived(clean_version.to_string()));
        }

        fs::create_dir_all(&self.root).or_raise(|| ErrorKind::Io(self.root.clone()))?;
        let source = build_dir.canonicalize().or_raise(|| ErrorKind::Io(build_dir.to_path_buf()))?;
        let skip = self.root.canonicalize().or_raise(|| ErrorKind::Io(self.root.clone()))?;

        // Built next to its final location; removed on drop unless moved into place.
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&self.root)
            .or_raise(|| ErrorKind::Io(self.root.clone()))?;
        let staged = staging.path().join(clean_version);
        let files = copy::copy_tree(&source, &staged, &self.exclude, Some(&skip))?;
        tracing::debug!(files, "Copied build output");

        let metadata = metadata::stamp(version, clean_version, self.commit.as_deref(), metadata::now())?;
        let json = serde_json::to_string_pretty(&metadata).or_raise(|| ErrorKind::Metadata)?;
        let metadata_path = staged.join(METADATA_FILE);
        fs::write(&metadata_path, json).or_raise(|| ErrorKind::Io(metadata_path))?;

        let rewritten = if self.rewrite {
            rewrite::rewrite_tree(&staged, self.path_prefix.as_deref())?
        } else {
            Rewritten::default()
        };

        if self.inject {
            let script = Injector::new()?.render(version, clean_version)?;
            let injector_path = staged.join(INJECTOR_FILE);
            fs::write(&injector_path, script).or_raise(|| ErrorKind::Io(injector_path))?;
        }

        if replaced {
            tracing::info!(directory = %directory.display(), "Replacing existing archive");
            let previous = staging.path().join("previous");
            fs::rename(&directory, &previous).or_raise(|| ErrorKind::Io(directory.clone()))?;
            if let Err(e) = fs::rename(&staged, &directory) {
                tracing::warn!(directory = %directory.display(), error = %e, "Restoring previous archive");
                fs::rename(&previous, &directory).or_raise(|| ErrorKind::Io(directory.clone()))?;
                return Err(e).or_raise(|| ErrorKind::Io(directory));
            }
        } else {
            fs::rename(&staged, &directory).or_raise(|| ErrorKind::Io(directory.clone()))?;
        }
        drop(staging);

        tracing::info!(
            version,
            clean_version,
            files,
            rewritten = rewritten.references,
            "Archived version"
        );
        Ok(Archived { directory, metadata, files, replaced, rewritten })
    }
}
