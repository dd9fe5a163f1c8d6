//! Recording host for testing.

use super::Host;
use crate::error::{ErrorKind, Result};
use std::sync::Mutex;

/// A navigation requested of a [`MockHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Location(String),
    Frame(String),
}

/// Records every navigation instead of performing it. Intended for tests,
/// here and in crates enabling the `mock` feature.
#[derive(Debug, Default)]
pub struct MockHost {
    navigations: Mutex<Vec<Navigation>>,
    refuse: bool,
}

impl MockHost {
    /// A host that refuses every navigation.
    pub fn refusing() -> Self {
        Self { refuse: true, ..Self::default() }
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        self.navigations.lock().map(|n| n.clone()).unwrap_or_default()
    }

    fn record(&self, navigation: Navigation) -> Result<()> {
        if self.refuse {
            let url = match navigation {
                Navigation::Location(url) | Navigation::Frame(url) => url,
            };
            exn::bail!(ErrorKind::Navigation(url));
        }
        if let Ok(mut navigations) = self.navigations.lock() {
            navigations.push(navigation);
        }
        Ok(())
    }
}

impl Host for MockHost {
    fn assign_location(&self, url: &str) -> Result<()> {
        self.record(Navigation::Location(url.to_string()))
    }

    fn load_frame(&self, url: &str) -> Result<()> {
        self.record(Navigation::Frame(url.to_string()))
    }
}
