use verstage_index::segment;

/// What the hosting page tells the switcher about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// Path of the current location (`/docs/1.2.0/guide.html`).
    pub path: String,
    /// Version announced by the page itself, as the injector script does
    /// with `window.currentVersion`.
    pub global: Option<String>,
}

impl Context {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), global: None }
    }

    pub fn with_global(mut self, global: Option<impl Into<String>>) -> Self {
        self.global = global.map(Into::into);
        self
    }

    /// The version the page itself points at: a version segment in the path,
    /// else a non-empty global.
    pub fn version_hint(&self) -> Option<&str> {
        segment::version_in(&self.path).or_else(|| self.global.as_deref().map(str::trim).filter(|g| !g.is_empty()))
    }
}
