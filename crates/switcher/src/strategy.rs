//! How a selected version is reached.
//!
//! The switcher core is shared by every page layout; only the way a target
//! is computed and handed to the [`Host`](crate::Host) differs. [`Redirect`]
//! leaves the page for the sibling version directory, [`Embed`] swaps the
//! version shown in an embedded frame and keeps the page.

use crate::HostHandle;
use crate::context::Context;
use crate::error::Result;
use verstage_index::models::CatalogEntry;
use verstage_index::segment;

/// What became of the page after navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// The page was left; nothing more happens on it.
    Departed,
    /// The page stays and now shows the selected version.
    Embedded,
}

pub trait Strategy: Send + Sync {
    /// Where selecting `entry` leads from the page described by `context`.
    /// Never fails.
    fn resolve_target(&self, context: &Context, entry: &CatalogEntry) -> String;

    fn perform(&self, target: &str) -> Result<Arrival>;
}

pub type StrategyHandle = Box<dyn Strategy>;

/// Full-page navigation to `<base><version path>/`.
pub struct Redirect {
    host: HostHandle,
}

impl Redirect {
    pub fn new(host: HostHandle) -> Self {
        Self { host }
    }
}

impl Strategy for Redirect {
    fn resolve_target(&self, context: &Context, entry: &CatalogEntry) -> String {
        segment::destination(&context.path, &entry.path)
    }

    fn perform(&self, target: &str) -> Result<Arrival> {
        self.host.assign_location(target)?;
        Ok(Arrival::Departed)
    }
}

/// Loads `<version path>/index.html` into the hosting page's frame.
pub struct Embed {
    host: HostHandle,
}

impl Embed {
    pub fn new(host: HostHandle) -> Self {
        Self { host }
    }
}

impl Strategy for Embed {
    fn resolve_target(&self, _context: &Context, entry: &CatalogEntry) -> String {
        format!("{}/index.html", entry.path.trim_end_matches('/'))
    }

    fn perform(&self, target: &str) -> Result<Arrival> {
        self.host.load_frame(target)?;
        Ok(Arrival::Embedded)
    }
}
