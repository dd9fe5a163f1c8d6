//! Absolute path rewriting for archived HTML.
//!
//! Sites built for a sub-directory deployment (`https://host/my-project/`)
//! reference their assets as `/my-project/assets/app.css`. Once archived
//! under `<root>/1.2.0/`, those references must point inside the version
//! directory instead, so `/my-project/` is replaced by the relative path
//! from each HTML file back to the version directory.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ATTRIBUTE_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:href|src)=["']/([\w.-]+)/[^"']+["']"#).unwrap());
static URL_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(["']?/([\w.-]+)/[^"')]+["']?\)"#).unwrap());

const UTF8_BOM: &str = "\u{feff}";

/// Summary of a rewrite pass over a version directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rewritten {
    /// HTML files that were modified.
    pub files: usize,
    /// Individual references that were replaced.
    pub references: usize,
}

/// Rewrites absolute `prefix` references in every HTML file under
/// `directory`.
///
/// Without an explicit prefix, candidates are detected from the HTML files
/// themselves. A detected candidate that names an entry at the top of the
/// version directory (`/assets/…` when `assets/` was archived) is a real
/// root-relative reference and is left alone.
pub(crate) fn rewrite_tree(directory: &Path, prefix: Option<&str>) -> Result<Rewritten> {
    let files = html_files(directory)?;
    let documents: Vec<(PathBuf, String)> = files.into_iter().filter_map(|path| read_html(&path).map(|c| (path, c))).collect();
    let prefixes: BTreeSet<String> = match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(prefix) => BTreeSet::from([prefix.to_string()]),
        None => detect_prefixes(documents.iter().map(|(_, content)| content.as_str()))
            .into_iter()
            .filter(|candidate| !directory.join(candidate).exists())
            .collect(),
    };
    if prefixes.is_empty() {
        tracing::debug!(files = documents.len(), "No absolute path prefixes to rewrite");
        return Ok(Rewritten::default());
    }
    tracing::debug!(?prefixes, "Rewriting absolute path prefixes");

    let mut summary = Rewritten::default();
    for (path, content) in documents {
        let depth = path.strip_prefix(directory).map(|p| p.components().count().saturating_sub(1)).unwrap_or(0);
        let relative = if depth == 0 { "./".to_string() } else { "../".repeat(depth) };
        let mut content = content;
        let mut replaced = 0;
        for prefix in &prefixes {
            let (updated, count) = rewrite_prefix(&content, prefix, &relative);
            content = updated;
            replaced += count;
        }
        if replaced > 0 {
            fs::write(&path, content).or_raise(|| ErrorKind::Io(path.clone()))?;
            tracing::debug!(path = %path.display(), references = replaced, "Rewrote absolute paths");
            summary.files += 1;
            summary.references += replaced;
        }
    }
    Ok(summary)
}

/// First path segments referenced absolutely from `href`, `src` or CSS
/// `url()`.
pub(crate) fn detect_prefixes<'a>(documents: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let mut prefixes = BTreeSet::new();
    for content in documents {
        for regex in [&*ATTRIBUTE_PREFIX_REGEX, &*URL_PREFIX_REGEX] {
            prefixes.extend(regex.captures_iter(content).filter_map(|c| c.get(1)).map(|m| m.as_str().to_string()));
        }
    }
    prefixes
}

/// Replaces `/prefix/` in `href`, `src` and `url()` references with
/// `relative`, keeping the existing quoting. Returns the new content and the
/// number of replacements.
pub(crate) fn rewrite_prefix(content: &str, prefix: &str, relative: &str) -> (String, usize) {
    let escaped = regex::escape(prefix);
    // Infallible: the prefix is escaped.
    let attribute = Regex::new(&format!(r#"(href|src)=(["'])/{escaped}/"#)).unwrap();
    let url = Regex::new(&format!(r#"url\((["']?)/{escaped}/"#)).unwrap();
    let count = attribute.find_iter(content).count() + url.find_iter(content).count();
    if count == 0 {
        return (content.to_string(), 0);
    }
    let content = attribute.replace_all(content, format!("${{1}}=${{2}}{relative}").as_str());
    let content = url.replace_all(&content, format!("url(${{1}}{relative}").as_str()).into_owned();
    (content, count)
}

fn html_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(directory).or_raise(|| ErrorKind::Io(directory.to_path_buf()))? {
        let path = entry.or_raise(|| ErrorKind::Io(directory.to_path_buf()))?.path();
        if path.is_dir() {
            files.extend(html_files(&path)?);
        } else if path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("html")) {
            files.push(path);
        }
    }
    Ok(files)
}

/// Reads an HTML file as UTF-8, dropping a byte order mark. Files in other
/// encodings are left untouched.
fn read_html(path: &Path) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Unable to read HTML file; skipping");
            return None;
        },
    };
    if bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF]) {
        tracing::warn!(path = %path.display(), "UTF-16 HTML is not rewritten");
        return None;
    }
    match String::from_utf8(bytes) {
        Ok(content) => Some(content.strip_prefix(UTF8_BOM).map(str::to_string).unwrap_or(content)),
        Err(_) => {
            tracing::warn!(path = %path.display(), "HTML file is not valid UTF-8; skipping");
            None
        },
    }
}
