use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::source::SourceHandle;
use crate::strategy::StrategyHandle;
use crate::switcher::Switcher;

/// Composition root for one page: owns at most one [`Switcher`].
///
/// Mounting twice fails with [`ErrorKind::AlreadyMounted`]; anything else
/// that needs the switcher borrows it from here.
pub struct Page {
    context: Context,
    match_build_date: bool,
    switcher: Option<Switcher>,
}

impl Page {
    pub fn new(context: Context) -> Self {
        Self { context, match_build_date: false, switcher: None }
    }

    pub fn with_build_date_matching(mut self, enabled: bool) -> Self {
        self.match_build_date = enabled;
        self
    }

    /// Creates the page's switcher and loads its catalog.
    pub async fn mount(&mut self, strategy: StrategyHandle, sources: &[SourceHandle]) -> Result<&mut Switcher> {
        if self.switcher.is_some() {
            exn::bail!(ErrorKind::AlreadyMounted);
        }
        let mut switcher =
            Switcher::new(self.context.clone(), strategy).with_build_date_matching(self.match_build_date);
        switcher.load_catalog(sources).await;
        Ok(self.switcher.insert(switcher))
    }

    pub fn switcher(&self) -> Option<&Switcher> {
        self.switcher.as_ref()
    }

    pub fn switcher_mut(&mut self) -> Option<&mut Switcher> {
        self.switcher.as_mut()
    }
}
