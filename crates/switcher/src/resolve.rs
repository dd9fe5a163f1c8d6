//! Pure resolution and filtering over a catalog.

use crate::catalog::Catalog;
use crate::context::Context;
use verstage_index::models::CatalogEntry;

/// Returned when neither the page nor the catalog names a version.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Determines which version the page is showing.
///
/// In order: a version segment in the location path, the global announced
/// by the page, the catalog's latest entry, and finally [`UNKNOWN_VERSION`].
pub fn resolve_current_version(context: &Context, catalog: &Catalog) -> String {
    context.version_hint().or_else(|| catalog.latest()).unwrap_or(UNKNOWN_VERSION).to_string()
}

/// Entries matching `query`, in catalog order.
///
/// Matching is a case-insensitive substring search on the display and clean
/// versions, and on the build date when `match_build_date` is set. A blank
/// query matches everything.
pub fn filter<'a>(entries: &'a [CatalogEntry], query: &str, match_build_date: bool) -> Vec<&'a CatalogEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.iter().collect();
    }
    let matches = |haystack: &str| haystack.to_lowercase().contains(&needle);
    entries
        .iter()
        .filter(|e| {
            matches(&e.version)
                || matches(&e.clean_version)
                || (match_build_date && e.build_date.as_deref().is_some_and(matches))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Origin;
    use rstest::rstest;
    use verstage_index::models::SimplifiedIndex;

    fn entry(version: &str, clean: &str, date: &str) -> CatalogEntry {
        CatalogEntry {
            version: version.into(),
            clean_version: clean.into(),
            build_date: Some(date.into()),
            path: clean.into(),
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            index: SimplifiedIndex::from_entries(vec![
                entry("v2.0.0", "2.0.0", "2024/9/1"),
                entry("v1.0.0", "1.0.0", "2024/1/1"),
                entry("v0.9.0", "0.9.0", "2023/12/1"),
            ]),
            origin: Origin::Loaded("test".into()),
        }
    }

    #[rstest]
    #[case("/docs/1.2.3/index.html", None, "1.2.3")]
    #[case("/docs/1.2.3/index.html", Some("0.1.0"), "1.2.3")]
    #[case("/docs/v1.2.3/guide/", Some("0.1.0"), "1.2.3")]
    #[case("/docs/index.html", Some("0.1.0"), "0.1.0")]
    #[case("/docs/index.html", Some("  "), "2.0.0")]
    #[case("/docs/index.html", None, "2.0.0")]
    #[case("/docs/1.2.3", None, "2.0.0")]
    fn test_resolve_current_version(#[case] path: &str, #[case] global: Option<&str>, #[case] expected: &str) {
        let context = Context::new(path).with_global(global);
        assert_eq!(resolve_current_version(&context, &catalog()), expected);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let context = Context::new("/x/3.0.0/a.html").with_global(Some("1.0.0"));
        let catalog = catalog();
        assert_eq!(resolve_current_version(&context, &catalog), resolve_current_version(&context, &catalog));
    }

    #[test]
    fn test_resolve_unknown_with_empty_catalog() {
        let catalog = Catalog { index: SimplifiedIndex::default(), origin: Origin::Loaded("test".into()) };
        assert_eq!(resolve_current_version(&Context::new("/"), &catalog), UNKNOWN_VERSION);
    }

    #[test]
    fn test_empty_query_is_identity() {
        let catalog = catalog();
        let all: Vec<_> = filter(catalog.entries(), "", false).into_iter().map(|e| e.version.as_str()).collect();
        assert_eq!(all, ["v2.0.0", "v1.0.0", "v0.9.0"]);
        assert_eq!(filter(catalog.entries(), "   ", false).len(), 3);
    }

    #[rstest]
    #[case("9", false, &["v0.9.0"])]
    #[case("V1", false, &["v1.0.0"])]
    #[case(".0.0", false, &["v2.0.0", "v1.0.0"])]
    #[case("2024", false, &[])]
    #[case("2024", true, &["v2.0.0", "v1.0.0"])]
    #[case("12/", true, &["v0.9.0"])]
    fn test_filter(#[case] query: &str, #[case] dates: bool, #[case] expected: &[&str]) {
        let catalog = catalog();
        let found: Vec<_> = filter(catalog.entries(), query, dates).into_iter().map(|e| e.version.as_str()).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_filter_does_not_mutate_catalog() {
        let catalog = catalog();
        let before = catalog.clone();
        let _ = filter(catalog.entries(), "9", true);
        assert_eq!(catalog, before);
    }
}
