//! Version-shaped path segments.
//!
//! Archived versions live in directories named after their clean version
//! (`1.2.3`, never `v1.2.3`). The same convention is used in URLs, so a page
//! served from `/docs/1.2.3/guide.html` is known to belong to version `1.2.3`.
//!
//! Everything that names, detects, strips or builds such a segment goes
//! through this module so that the archiver, the index builder and the
//! switcher agree on what a version segment is. Parsing accepts an optional
//! `v` prefix for hand-made directories; the captured version never
//! includes it.

use regex::Regex;
use std::sync::LazyLock;

static SEGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?(\d+\.\d+\.\d+(?:-[0-9A-Za-z]+(?:\.[0-9A-Za-z]+)*)?)$").unwrap());

/// A version segment located inside a URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located<'a> {
    /// Everything before the version segment, including the trailing `/`.
    pub base: &'a str,
    /// The version, without any `v` prefix.
    pub version: &'a str,
}

/// Returns the version encoded by a single path component, if it is
/// version-shaped.
///
/// ```
/// use verstage_index::segment;
/// assert_eq!(segment::parse("1.2.3"), Some("1.2.3"));
/// assert_eq!(segment::parse("v1.2.3"), Some("1.2.3"));
/// assert_eq!(segment::parse("2.0.0-beta.1"), Some("2.0.0-beta.1"));
/// assert_eq!(segment::parse("1.2"), None);
/// assert_eq!(segment::parse("assets"), None);
/// ```
pub fn parse(component: &str) -> Option<&str> {
    SEGMENT_REGEX.captures(component).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Finds the first directory component of `path` that is version-shaped.
///
/// Only components followed by a `/` count: the final component of a URL
/// path is a file (or an unnormalized directory) and is never treated as a
/// version.
pub fn locate(path: &str) -> Option<Located<'_>> {
    let mut offset = 0;
    while let Some(end) = path[offset..].find('/') {
        let component = &path[offset..offset + end];
        if let Some(version) = parse(component) {
            return Some(Located { base: &path[..offset], version });
        }
        offset += end + 1;
    }
    None
}

/// The version encoded in a URL path, if any.
pub fn version_in(path: &str) -> Option<&str> {
    locate(path).map(|l| l.version)
}

/// The directory that sibling versions live in, as seen from `path`.
///
/// Inside a versioned directory this is everything before the version
/// segment; anywhere else it is the directory containing the current page.
///
/// ```
/// use verstage_index::segment;
/// assert_eq!(segment::base_path("/docs/1.2.3/guide/intro.html"), "/docs/");
/// assert_eq!(segment::base_path("/docs/index.html"), "/docs/");
/// assert_eq!(segment::base_path("/docs/"), "/docs/");
/// assert_eq!(segment::base_path(""), "/");
/// ```
pub fn base_path(path: &str) -> &str {
    if let Some(located) = locate(path) {
        return located.base;
    }
    if path.is_empty() {
        return "/";
    }
    match path.rfind('/') {
        Some(i) => &path[..=i],
        None => "",
    }
}

/// Composes the URL of a version directory as seen from `path`.
///
/// Re-resolving the result with [`version_in`] yields the version encoded by
/// `version_path`, which keeps navigation and detection consistent.
///
/// ```
/// use verstage_index::segment;
/// assert_eq!(segment::destination("/docs/1.0.0/index.html", "1.1.0"), "/docs/1.1.0/");
/// assert_eq!(segment::destination("/docs/index.html", "1.1.0"), "/docs/1.1.0/");
/// ```
pub fn destination(path: &str, version_path: &str) -> String {
    let base = base_path(path);
    let target = version_path.trim_matches('/');
    if target.is_empty() {
        return base.to_string();
    }
    format!("{base}{target}/")
}
