//! Per-version injector script.
//!
//! Archived pages that include `version-injector.js` learn which version they
//! belong to through `window.currentVersion`, and pull in the shared switcher
//! script and stylesheet from the archive root exactly once.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;
use upon::{Engine, Template};

const TEMPLATE_NAME: &str = "injector.js";
const SWITCHER_SCRIPT: &str = "../version-switcher.js";
const SWITCHER_STYLESHEET: &str = "../version-switcher.css";

#[derive(Embed)]
#[folder = "templates/"]
struct Templates;

pub(crate) struct Injector {
    engine: Engine<'static>,
    template: Template<'static>,
}
impl Injector {
    pub(crate) fn new() -> Result<Self> {
        let source = Templates::get(TEMPLATE_NAME).ok_or_raise(|| ErrorKind::Template)?;
        let source = String::from_utf8(source.data.into_owned()).or_raise(|| ErrorKind::Template)?;
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(source).or_raise(|| ErrorKind::Template)?;
        Ok(Self { engine, template })
    }

    pub(crate) fn render(&self, version: &str, clean_version: &str) -> Result<String> {
        let context = upon::value! {
            version: version,
            clean_version: clean_version,
            script: SWITCHER_SCRIPT,
            stylesheet: SWITCHER_STYLESHEET,
        };
        self.template.render(&self.engine, &context).to_string().or_raise(|| ErrorKind::Template)
    }
}

/// Custom [`upon`] extensions for JavaScript output.
mod addons {
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    /// Writes strings as JavaScript string literals.
    fn js_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => f.write_str(&serde_json::Value::from(s.as_str()).to_string())?,
            Value::None => f.write_str("null")?,
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("js", js_formatter);
    }
}
