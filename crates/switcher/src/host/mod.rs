//! The page hosting the switcher.
//!
//! Navigation itself belongs to whatever embeds the switcher: a browser
//! bridge, a test double, or the CLI printing where it would go.

#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(any(test, feature = "mock"))]
pub use self::mock::{MockHost, Navigation};
use crate::error::Result;

pub trait Host {
    /// Leaves the current page for `url`.
    fn assign_location(&self, url: &str) -> Result<()>;

    /// Loads `url` into the page's embedded frame.
    fn load_frame(&self, url: &str) -> Result<()>;
}
