//! Landing page for the archive root.
//!
//! Renders the simplified index into an HTML page listing every archived
//! version in index order, marking the latest one and linking each version
//! directory. The template is embedded at compile time and rendered with
//! [upon].

use crate::error::{ErrorKind, Result};
use crate::models::SimplifiedIndex;
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;
use serde::Serialize;
use tracing::instrument;
use upon::{Engine, Template};

const TEMPLATE_NAME: &str = "landing.html";
const DEFAULT_TITLE: &str = "Version Archive";

#[derive(Embed)]
#[folder = "templates/"]
struct Templates;

#[derive(Serialize)]
struct Context<'a> {
    title: &'a str,
    count: usize,
    latest: Option<&'a str>,
    versions: Vec<Item<'a>>,
}

#[derive(Serialize)]
struct Item<'a> {
    version: &'a str,
    build_date: &'a str,
    path: &'a str,
    latest: bool,
}

/// A compiled landing page template.
pub struct LandingPage {
    engine: Engine<'static>,
    template: Template<'static>,
    title: String,
}
impl LandingPage {
    /// Compiles the builtin landing page template.
    pub fn new() -> Result<Self> {
        let source = Templates::get(TEMPLATE_NAME).ok_or_raise(|| ErrorKind::AssetNotFound(TEMPLATE_NAME.into()))?;
        let source = String::from_utf8(source.data.into_owned()).or_raise(|| ErrorKind::Template)?;
        Self::from_template(source)
    }

    /// Compiles a custom landing page template. The template receives
    /// `title`, `count`, `latest` and `versions` (each with `version`,
    /// `build_date`, `path` and `latest`).
    pub fn from_template(source: impl Into<String>) -> Result<Self> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(source.into()).or_raise(|| ErrorKind::Template)?;
        Ok(Self { engine, template, title: DEFAULT_TITLE.to_string() })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[instrument(skip_all, fields(count = index.versions.len()))]
    pub fn render(&self, index: &SimplifiedIndex) -> Result<String> {
        let latest = index.latest_clean_version();
        let context = Context {
            title: &self.title,
            count: index.versions.len(),
            latest: index.latest.as_ref().map(|l| l.version.as_str()),
            versions: index
                .versions
                .iter()
                .map(|entry| Item {
                    version: &entry.version,
                    build_date: entry.build_date.as_deref().unwrap_or("unknown"),
                    path: entry.path.trim_matches('/'),
                    latest: Some(entry.clean_version.as_str()) == latest,
                })
                .collect(),
        };
        self.template.render(&self.engine, &context).to_string().or_raise(|| ErrorKind::Template)
    }
}

/// Custom [`upon`] extensions for HTML output.
mod addons {
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    /// Escapes the characters that are significant in HTML text and
    /// double-quoted attributes.
    fn escape_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => {
                for c in s.chars() {
                    match c {
                        '&' => f.write_str("&amp;")?,
                        '<' => f.write_str("&lt;")?,
                        '>' => f.write_str("&gt;")?,
                        '"' => f.write_str("&quot;")?,
                        '\'' => f.write_str("&#x27;")?,
                        c => f.write_char(c)?,
                    }
                }
            },
            Value::None => {},
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("escape", escape_formatter);
    }
}
