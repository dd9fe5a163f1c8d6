//! The switcher state machine.
//!
//! ```text
//! Uninitialized --load_catalog--> Ready --select (redirect)--> Departed
//!                                   ^  \
//!                                   |   open / close / search / select (embed)
//!                                   +---/
//! ```
//!
//! While `Ready` the switcher's list is open or closed. Opening and closing
//! both clear the search query. All state lives here; [`Switcher::render`]
//! projects it into a [`View`] after every change.

use crate::catalog::Catalog;
use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::resolve::{self, UNKNOWN_VERSION};
use crate::source::SourceHandle;
use crate::strategy::{Arrival, StrategyHandle};
use crate::view::{Item, View};
use tracing::instrument;
use verstage_index::models::CatalogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The catalog hasn't been loaded.
    Uninitialized,
    /// The catalog is loaded (or substituted) and the current version known.
    Ready,
    /// A redirect left the page.
    Departed,
}

/// User interactions, in the order the page receives them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open,
    Close,
    Toggle,
    Escape,
    /// A click anywhere outside the switcher.
    OutsideClick,
    Search(String),
    /// Selection of the entry with this clean version.
    Select(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event had no effect in the current state.
    Unchanged,
    Opened,
    Closed,
    Filtered,
    /// The selected version is already shown; the list was closed.
    Stayed,
    Navigated { target: String, arrival: Arrival },
}

pub struct Switcher {
    context: Context,
    strategy: StrategyHandle,
    match_build_date: bool,
    phase: Phase,
    catalog: Option<Catalog>,
    /// Version shown in the embedded frame after a selection.
    embedded: Option<String>,
    current: String,
    open: bool,
    query: String,
}

impl Switcher {
    pub fn new(context: Context, strategy: StrategyHandle) -> Self {
        Self {
            context,
            strategy,
            match_build_date: false,
            phase: Phase::Uninitialized,
            catalog: None,
            embedded: None,
            current: UNKNOWN_VERSION.to_string(),
            open: false,
            query: String::new(),
        }
    }

    /// Also match search queries against build dates.
    pub fn with_build_date_matching(mut self, enabled: bool) -> Self {
        self.match_build_date = enabled;
        self
    }

    /// Loads the catalog from the first source that provides one and
    /// resolves the current version. Only the first call loads anything.
    #[instrument(skip_all, fields(path = %self.context.path))]
    pub async fn load_catalog(&mut self, sources: &[SourceHandle]) -> &Catalog {
        let catalog = match self.catalog.take() {
            Some(catalog) => catalog,
            None => {
                let catalog = Catalog::load(sources, &self.context).await;
                self.current = resolve::resolve_current_version(&self.context, &catalog);
                self.phase = Phase::Ready;
                tracing::debug!(current = %self.current, available = catalog.is_available(), "Switcher ready");
                catalog
            },
        };
        self.catalog.insert(catalog)
    }

    /// The version the page is showing. Pure: the same context, catalog and
    /// embedded selection always give the same answer.
    pub fn resolve_current_version(&self) -> String {
        if let Some(embedded) = &self.embedded {
            return embedded.clone();
        }
        match &self.catalog {
            Some(catalog) => resolve::resolve_current_version(&self.context, catalog),
            None => self.context.version_hint().unwrap_or(UNKNOWN_VERSION).to_string(),
        }
    }

    /// Catalog entries matching `query`, without touching the catalog or the
    /// switcher's own query.
    pub fn filter(&self, query: &str) -> Vec<&CatalogEntry> {
        match &self.catalog {
            Some(catalog) => resolve::filter(catalog.entries(), query, self.match_build_date),
            None => Vec::new(),
        }
    }

    pub fn compute_destination(&self, entry: &CatalogEntry) -> String {
        self.strategy.resolve_target(&self.context, entry)
    }

    /// Applies a user interaction.
    ///
    /// # Errors
    /// - [`ErrorKind::NotReady`] when selecting before the catalog is loaded
    ///   or after the page was left,
    /// - [`ErrorKind::UnknownVersion`] when selecting a version that isn't in
    ///   the catalog,
    /// - the host's error when navigation fails. The switcher stays `Ready`
    ///   and nothing is retried.
    pub fn handle(&mut self, event: Event) -> Result<Outcome> {
        if self.phase != Phase::Ready {
            if matches!(event, Event::Select(_)) {
                exn::bail!(ErrorKind::NotReady);
            }
            return Ok(Outcome::Unchanged);
        }
        Ok(match event {
            Event::Open if !self.open => self.open(),
            Event::Toggle if !self.open => self.open(),
            Event::Close | Event::Escape | Event::OutsideClick | Event::Toggle if self.open => self.close(),
            Event::Search(query) => {
                self.query = query;
                Outcome::Filtered
            },
            Event::Select(clean_version) => return self.select(&clean_version),
            _ => Outcome::Unchanged,
        })
    }

    fn open(&mut self) -> Outcome {
        self.open = true;
        self.query.clear();
        Outcome::Opened
    }

    fn close(&mut self) -> Outcome {
        self.open = false;
        self.query.clear();
        Outcome::Closed
    }

    #[instrument(skip(self), fields(current = %self.current))]
    fn select(&mut self, clean_version: &str) -> Result<Outcome> {
        let entry = self
            .catalog
            .as_ref()
            .and_then(|c| c.find(clean_version))
            .cloned();
        let Some(entry) = entry else {
            exn::bail!(ErrorKind::UnknownVersion(clean_version.to_string()));
        };
        self.close();
        if entry.clean_version == self.current {
            tracing::debug!("Selected version is already shown");
            return Ok(Outcome::Stayed);
        }
        let target = self.compute_destination(&entry);
        let arrival = match self.strategy.perform(&target) {
            Ok(arrival) => arrival,
            Err(e) => {
                tracing::warn!(%target, error = ?e, "Navigation failed");
                return Err(e);
            },
        };
        match arrival {
            Arrival::Departed => self.phase = Phase::Departed,
            Arrival::Embedded => {
                self.embedded = Some(entry.clean_version.clone());
                self.current = self.resolve_current_version();
            },
        }
        tracing::info!(%target, version = %entry.version, "Switched version");
        Ok(Outcome::Navigated { target, arrival })
    }

    /// Projects the current state into a [`View`].
    pub fn render(&self) -> View {
        let latest = self.catalog.as_ref().and_then(Catalog::latest);
        let label = self
            .catalog
            .as_ref()
            .and_then(|c| c.find(&self.current))
            .map(|e| e.version.clone())
            .unwrap_or_else(|| self.current.clone());
        let items = self
            .filter(&self.query)
            .into_iter()
            .map(|e| Item {
                version: e.version.clone(),
                clean_version: e.clean_version.clone(),
                build_date: e.build_date.clone(),
                path: e.path.clone(),
                current: e.clean_version == self.current,
                latest: Some(e.clean_version.as_str()) == latest,
            })
            .collect();
        View { label, open: self.open, query: self.query.clone(), items }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_version(&self) -> &str {
        &self.current
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Origin;
    use crate::host::{MockHost, Navigation};
    use crate::source::{FileSource, StaticSource};
    use crate::strategy::{Embed, Redirect};
    use std::ops::Deref;
    use std::sync::Arc;
    use verstage_index::models::SimplifiedIndex;
    use verstage_index::segment;

    fn entry(clean: &str, date: &str) -> CatalogEntry {
        CatalogEntry {
            version: format!("v{clean}"),
            clean_version: clean.into(),
            build_date: Some(date.into()),
            path: clean.into(),
        }
    }

    fn index() -> SimplifiedIndex {
        SimplifiedIndex::from_entries(vec![
            entry("2.0.0", "2024/9/1"),
            entry("1.0.0", "2024/1/1"),
            entry("0.9.0", "2023/12/1"),
        ])
    }

    fn sources() -> Vec<SourceHandle> {
        vec![Arc::new(StaticSource::new(index()))]
    }

    async fn redirecting(path: &str) -> (Switcher, Arc<MockHost>) {
        let host = Arc::new(MockHost::default());
        let mut switcher = Switcher::new(Context::new(path), Box::new(Redirect::new(host.clone())));
        switcher.load_catalog(&sources()).await;
        (switcher, host)
    }

    #[tokio::test]
    async fn test_load_resolves_current_version() {
        let (switcher, _) = redirecting("/docs/1.0.0/index.html").await;
        assert_eq!(switcher.phase(), Phase::Ready);
        assert_eq!(switcher.current_version(), "1.0.0");
        assert_eq!(switcher.catalog().unwrap().origin, Origin::Loaded("static".into()));
    }

    #[tokio::test]
    async fn test_load_defaults_to_latest() {
        let (switcher, _) = redirecting("/docs/index.html").await;
        assert_eq!(switcher.current_version(), "2.0.0");
    }

    #[tokio::test]
    async fn test_load_falls_back_through_sources() {
        let temp_dir = tempfile::tempdir().unwrap();
        let sources: Vec<SourceHandle> = vec![
            Arc::new(FileSource::new(temp_dir.path().join("missing.json"))),
            Arc::new(StaticSource::new(index())),
        ];
        let mut switcher = Switcher::new(Context::new("/"), Box::new(Redirect::new(Arc::new(MockHost::default()))));
        let catalog = switcher.load_catalog(&sources).await;
        assert!(catalog.is_available());
        assert_eq!(catalog.entries().len(), 3);
    }

    #[tokio::test]
    async fn test_unavailable_catalog_is_synthetic() {
        let temp_dir = tempfile::tempdir().unwrap();
        let sources: Vec<SourceHandle> = vec![Arc::new(FileSource::new(temp_dir.path().join("missing.json")))];
        let host = Arc::new(MockHost::default());
        let mut switcher = Switcher::new(Context::new("/docs/1.4.0/"), Box::new(Redirect::new(host.clone())));
        let catalog = switcher.load_catalog(&sources).await;
        assert_eq!(catalog.origin, Origin::Unavailable);
        assert_eq!(catalog.entries().len(), 1);
        assert_eq!(switcher.phase(), Phase::Ready);
        assert_eq!(switcher.current_version(), "1.4.0");

        // The only entry is the page itself.
        assert_eq!(switcher.handle(Event::Select("1.4.0".into())).unwrap(), Outcome::Stayed);
        assert!(host.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_catalog_without_hints() {
        let mut switcher = Switcher::new(Context::new("/"), Box::new(Redirect::new(Arc::new(MockHost::default()))));
        switcher.load_catalog(&[]).await;
        assert_eq!(switcher.current_version(), UNKNOWN_VERSION);
        assert_eq!(switcher.render().label, UNKNOWN_VERSION);
    }

    #[tokio::test]
    async fn test_catalog_loads_once() {
        let (mut switcher, _) = redirecting("/docs/").await;
        let other: Vec<SourceHandle> = vec![Arc::new(StaticSource::new(SimplifiedIndex::default()))];
        assert_eq!(switcher.load_catalog(&other).await.entries().len(), 3);
    }

    #[tokio::test]
    async fn test_open_and_close_reset_query() {
        let (mut switcher, _) = redirecting("/docs/").await;
        assert_eq!(switcher.handle(Event::Open).unwrap(), Outcome::Opened);
        assert_eq!(switcher.handle(Event::Open).unwrap(), Outcome::Unchanged);
        switcher.handle(Event::Search("9".into())).unwrap();
        assert_eq!(switcher.render().items.len(), 1);
        assert_eq!(switcher.handle(Event::Escape).unwrap(), Outcome::Closed);
        assert_eq!(switcher.query(), "");
        assert_eq!(switcher.render().items.len(), 3);

        switcher.handle(Event::Search("1".into())).unwrap();
        assert_eq!(switcher.handle(Event::Toggle).unwrap(), Outcome::Opened);
        assert_eq!(switcher.query(), "");
        assert_eq!(switcher.handle(Event::OutsideClick).unwrap(), Outcome::Closed);
        assert_eq!(switcher.handle(Event::OutsideClick).unwrap(), Outcome::Unchanged);
    }

    #[tokio::test]
    async fn test_selecting_current_version_only_closes() {
        let (mut switcher, host) = redirecting("/docs/1.0.0/guide.html").await;
        switcher.handle(Event::Open).unwrap();
        assert_eq!(switcher.handle(Event::Select("1.0.0".into())).unwrap(), Outcome::Stayed);
        assert!(!switcher.is_open());
        assert_eq!(switcher.phase(), Phase::Ready);
        assert!(host.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_departs() {
        let (mut switcher, host) = redirecting("/docs/1.0.0/guide.html").await;
        let outcome = switcher.handle(Event::Select("2.0.0".into())).unwrap();
        assert_eq!(outcome, Outcome::Navigated { target: "/docs/2.0.0/".into(), arrival: Arrival::Departed });
        assert_eq!(switcher.phase(), Phase::Departed);
        assert_eq!(host.navigations(), [Navigation::Location("/docs/2.0.0/".into())]);

        assert_eq!(switcher.handle(Event::Open).unwrap(), Outcome::Unchanged);
        let err = switcher.handle(Event::Select("0.9.0".into())).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::NotReady));
    }

    #[tokio::test]
    async fn test_embed_pins_selected_version() {
        let host = Arc::new(MockHost::default());
        let mut switcher = Switcher::new(Context::new("/index.html"), Box::new(Embed::new(host.clone())));
        switcher.load_catalog(&sources()).await;
        assert_eq!(switcher.current_version(), "2.0.0");

        let outcome = switcher.handle(Event::Select("0.9.0".into())).unwrap();
        assert_eq!(outcome, Outcome::Navigated { target: "0.9.0/index.html".into(), arrival: Arrival::Embedded });
        assert_eq!(switcher.phase(), Phase::Ready);
        assert_eq!(switcher.current_version(), "0.9.0");
        assert_eq!(switcher.resolve_current_version(), "0.9.0");
        assert_eq!(switcher.handle(Event::Select("0.9.0".into())).unwrap(), Outcome::Stayed);
        assert_eq!(host.navigations(), [Navigation::Frame("0.9.0/index.html".into())]);
    }

    #[tokio::test]
    async fn test_embed_under_versioned_path_follows_selection() {
        let host = Arc::new(MockHost::default());
        let mut switcher = Switcher::new(Context::new("/docs/1.0.0/index.html"), Box::new(Embed::new(host.clone())));
        switcher.load_catalog(&sources()).await;
        assert_eq!(switcher.current_version(), "1.0.0");

        switcher.handle(Event::Select("2.0.0".into())).unwrap();
        assert_eq!(switcher.current_version(), "2.0.0");
        assert_eq!(switcher.render().label, "v2.0.0");

        // Going back to the page's own version reloads the frame.
        let outcome = switcher.handle(Event::Select("1.0.0".into())).unwrap();
        assert_eq!(outcome, Outcome::Navigated { target: "1.0.0/index.html".into(), arrival: Arrival::Embedded });
        assert_eq!(switcher.current_version(), "1.0.0");
        assert_eq!(
            host.navigations(),
            [Navigation::Frame("2.0.0/index.html".into()), Navigation::Frame("1.0.0/index.html".into())]
        );
    }

    #[tokio::test]
    async fn test_select_before_load() {
        let mut switcher = Switcher::new(Context::new("/"), Box::new(Redirect::new(Arc::new(MockHost::default()))));
        assert_eq!(switcher.phase(), Phase::Uninitialized);
        assert_eq!(switcher.handle(Event::Open).unwrap(), Outcome::Unchanged);
        let err = switcher.handle(Event::Select("1.0.0".into())).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::NotReady));
    }

    #[tokio::test]
    async fn test_select_unknown_version() {
        let (mut switcher, _) = redirecting("/docs/").await;
        let err = switcher.handle(Event::Select("3.0.0".into())).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::UnknownVersion(v) if v == "3.0.0"));
    }

    #[tokio::test]
    async fn test_failed_navigation_stays_ready() {
        let mut switcher =
            Switcher::new(Context::new("/docs/"), Box::new(Redirect::new(Arc::new(MockHost::refusing()))));
        switcher.load_catalog(&sources()).await;
        let err = switcher.handle(Event::Select("1.0.0".into())).unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::Navigation(t) if t == "/docs/1.0.0/"));
        assert_eq!(switcher.phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn test_render_marks_current_and_latest() {
        let (mut switcher, _) = redirecting("/docs/1.0.0/").await;
        let view = switcher.render();
        assert_eq!(view.label, "v1.0.0");
        assert!(!view.open);
        let marks: Vec<_> = view.items.iter().map(|i| (i.clean_version.as_str(), i.current, i.latest)).collect();
        assert_eq!(marks, [("2.0.0", false, true), ("1.0.0", true, false), ("0.9.0", false, false)]);

        switcher.handle(Event::Open).unwrap();
        switcher.handle(Event::Search("nothing".into())).unwrap();
        let view = switcher.render();
        assert!(view.open);
        assert!(view.is_empty());
        assert_eq!(view.query, "nothing");
    }

    #[tokio::test]
    async fn test_build_date_matching() {
        let host = Arc::new(MockHost::default());
        let mut switcher =
            Switcher::new(Context::new("/"), Box::new(Redirect::new(host))).with_build_date_matching(true);
        switcher.load_catalog(&sources()).await;
        assert_eq!(switcher.filter("2023").len(), 1);
        assert_eq!(switcher.filter("").len(), 3);
    }

    #[tokio::test]
    async fn test_destination_agrees_with_resolution() {
        for path in ["/docs/1.0.0/index.html", "/docs/v1.0.0/a/b.html", "/docs/index.html", "/", "/1.0.0/"] {
            let (switcher, _) = redirecting(path).await;
            let current = switcher.resolve_current_version();
            let entry = switcher.catalog().unwrap().find(&current).unwrap().clone();
            let destination = switcher.compute_destination(&entry);
            assert_eq!(destination, switcher.compute_destination(&entry));
            assert_eq!(segment::version_in(&destination), Some(current.as_str()));

            let (revisited, _) = redirecting(&destination).await;
            assert_eq!(revisited.current_version(), current);
        }
    }
}
