pub mod archive;
pub mod index;
pub mod list;
pub mod resolve;
pub mod switch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use verstage_config::Config;
use verstage_index::{IndexBuilder, LandingPage};
use verstage_switcher::{Context, FileSource, SourceHandle};

/// Arguments shared by commands that look at the archive from a page.
#[derive(clap::Args)]
pub struct PageArgs {
    /// Path of the page, as in the browser's address bar (`/docs/1.2.0/`).
    path: String,

    /// Version announced by the page itself (`window.currentVersion`).
    #[arg(short, long)]
    global: Option<String>,

    /// Directory the site is served from; catalog locations starting with
    /// `/` are looked up here. Defaults to the archive root.
    #[arg(long)]
    site_root: Option<PathBuf>,
}

impl PageArgs {
    fn context(&self) -> Context {
        Context::new(&self.path).with_global(self.global.as_deref())
    }

    /// The configured catalog locations, resolved the way the page would
    /// resolve them.
    fn sources(&self, config: &Config) -> Vec<SourceHandle> {
        let site_root = self.site_root.clone().unwrap_or_else(|| config.archive.root.clone());
        let page_directory = match self.path.rfind('/') {
            Some(i) => site_root.join(self.path[..i].trim_start_matches('/')),
            None => site_root.clone(),
        };
        config
            .switcher
            .catalog
            .iter()
            .map(|location| location.trim())
            .filter(|location| !location.is_empty())
            .map(|location| Arc::new(FileSource::resolve(&site_root, &page_directory, location)) as SourceHandle)
            .collect()
    }
}

fn archive_root(root: Option<PathBuf>, config: &Config) -> PathBuf {
    root.unwrap_or_else(|| config.archive.root.clone())
}

fn index_builder(root: &Path, config: &Config) -> verstage_index::error::Result<IndexBuilder> {
    let landing = LandingPage::new()?.with_title(&config.index.title);
    Ok(IndexBuilder::new(root)?.with_landing(landing))
}
