//! Version ordering.
//!
//! Clean versions are compared as semantic versions whenever both sides
//! parse (strictly, or coerced from a looser `1`, `1.2` or `release-1.2.3`
//! form). Anything else falls back to comparing the raw strings. The result
//! is newest first.

use crate::models::VersionRecord;
use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::sync::LazyLock;

static COERCE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").unwrap());

/// Interprets a clean version as a semantic version, if at all possible.
///
/// A leading `v` is ignored. Strings that aren't valid semver are coerced
/// from the first run of up to three dot-separated numbers, with missing
/// components filled with zero; pre-release tags are lost in coercion.
pub fn semantic(clean: &str) -> Option<Version> {
    let trimmed = clean.trim();
    let strict = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    if let Ok(version) = Version::parse(strict) {
        return Some(version);
    }
    let captures = COERCE_REGEX.captures(trimmed)?;
    let component = |i: usize| -> Option<u64> {
        match captures.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some(Version::new(component(1)?, component(2)?, component(3)?))
}

/// Orders two clean versions newest first.
///
/// Semantic versions compare by precedence (build metadata ignored). If
/// either side isn't a semantic version, the raw strings compare in reverse
/// byte order.
pub fn newest_first(a: &str, b: &str) -> Ordering {
    compare_parsed(a, semantic(a).as_ref(), b, semantic(b).as_ref())
}

fn compare_parsed(a: &str, a_parsed: Option<&Version>, b: &str, b_parsed: Option<&Version>) -> Ordering {
    match (a_parsed, b_parsed) {
        (Some(a), Some(b)) => b.cmp_precedence(a),
        _ => b.cmp(a),
    }
}

/// Sorts records newest first, keeping the input order of equal versions.
///
/// Mixing semantic and lexicographic comparison isn't guaranteed to be
/// transitive (`1.0.0` and `v1.0.0` are equal as versions but `a` sorts
/// between them as a string). [`slice::sort_by`] may panic on such a
/// comparator, so a plain stable insertion sort is used instead; archives
/// are small.
pub fn sort_newest_first(records: &mut Vec<VersionRecord>) {
    let mut keyed: Vec<(Option<Version>, VersionRecord)> =
        records.drain(..).map(|r| (semantic(r.clean_version()), r)).collect();
    insertion_sort_by(&mut keyed, |(a_parsed, a), (b_parsed, b)| {
        compare_parsed(a.clean_version(), a_parsed.as_ref(), b.clean_version(), b_parsed.as_ref())
    });
    records.extend(keyed.into_iter().map(|(_, r)| r));
}

fn insertion_sort_by<T>(items: &mut [T], mut compare: impl FnMut(&T, &T) -> Ordering) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}
