//! Dotted numeric version comparison.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";
const ZERO_SEGMENT: &str = "0";

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)*)(.*)$").expect("valid version regex"));

/// Version string split into numeric segments and a trailing qualifier.
///
/// `1.10.2-beta` parses into segments `[1, 10, 2]` and qualifier `-beta`.
/// Segments are kept as normalized digit strings so arbitrarily long numbers
/// compare without overflow.
#[derive(Debug, Clone)]
pub struct ParsedVersion {
    segments: Vec<String>,
    qualifier: String,
}

impl ParsedVersion {
    /// Parses one version string.
    ///
    /// A trailing `-SNAPSHOT` marker (any case) is dropped before parsing.
    /// Input without a numeric prefix keeps everything as qualifier.
    pub fn parse(raw: &str) -> Self {
        let trimmed = strip_snapshot(raw.trim());
        match VERSION_RE.captures(trimmed) {
            Some(caps) => Self {
                segments: caps[1].split('.').map(normalize_segment).collect(),
                qualifier: caps[2].to_string(),
            },
            None => Self {
                segments: Vec::new(),
                qualifier: trimmed.to_string(),
            },
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// Compares the first `len` numeric segments only, padding with zero.
    pub(crate) fn cmp_numeric_prefix(&self, other: &Self, len: usize) -> Ordering {
        for index in 0..len {
            let ordering = compare_segment(self.segment(index), other.segment(index));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    pub(crate) fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn segment(&self, index: usize) -> &str {
        self.segments
            .get(index)
            .map(String::as_str)
            .unwrap_or(ZERO_SEGMENT)
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segment_count().max(other.segment_count());
        self.cmp_numeric_prefix(other, len)
            .then_with(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// `1.0` and `1` are equal versions, so equality must follow `Ord`.
impl PartialEq for ParsedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParsedVersion {}

/// Orders two version strings.
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    ParsedVersion::parse(left).cmp(&ParsedVersion::parse(right))
}

/// Returns whether `candidate` is the same as or newer than `required`.
pub fn is_at_least(candidate: &str, required: &str) -> bool {
    compare_versions(candidate, required) != Ordering::Less
}

fn strip_snapshot(value: &str) -> &str {
    let Some(split_at) = value.len().checked_sub(SNAPSHOT_SUFFIX.len()) else {
        return value;
    };
    match value.get(split_at..) {
        Some(tail) if tail.eq_ignore_ascii_case(SNAPSHOT_SUFFIX) => &value[..split_at],
        _ => value,
    }
}

fn normalize_segment(raw: &str) -> String {
    let stripped = raw.trim_start_matches('0');
    if stripped.is_empty() {
        ZERO_SEGMENT.to_string()
    } else {
        stripped.to_string()
    }
}

fn compare_segment(left: &str, right: &str) -> Ordering {
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

#[cfg(test)]
mod tests {
    use super::{compare_versions, is_at_least, ParsedVersion};
    use std::cmp::Ordering;

    #[test]
    fn compares_segments_numerically() {
        assert_eq!(compare_versions("1.10", "1.9"), Ordering::Greater);
        assert_eq!(compare_versions("1.9.2", "1.10"), Ordering::Less);
        assert_eq!(compare_versions("2.0", "10.0"), Ordering::Less);
    }

    #[test]
    fn treats_missing_trailing_segments_as_zero() {
        assert_eq!(compare_versions("1.9", "1.9.0"), Ordering::Equal);
        assert_eq!(compare_versions("1", "1.0.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.9", "1.9.1"), Ordering::Less);
    }

    #[test]
    fn ignores_leading_zeros() {
        assert_eq!(compare_versions("1.09", "1.9"), Ordering::Equal);
        assert_eq!(compare_versions("1.010", "1.9"), Ordering::Greater);
    }

    #[test]
    fn compares_qualifier_only_after_numeric_segments() {
        assert_eq!(compare_versions("1.9-beta", "1.9-alpha"), Ordering::Greater);
        assert_eq!(compare_versions("1.10-alpha", "1.9-beta"), Ordering::Greater);
        assert_eq!(compare_versions("1.9", "1.9-beta"), Ordering::Less);
    }

    #[test]
    fn drops_snapshot_marker() {
        assert_eq!(compare_versions("1.9.0-SNAPSHOT", "1.9.0"), Ordering::Equal);
        assert_eq!(compare_versions("2.1-snapshot", "2.1"), Ordering::Equal);
    }

    #[test]
    fn handles_very_long_segments_without_overflow() {
        assert_eq!(
            compare_versions("1.123456789012345678901234567890", "1.99999999999999999999"),
            Ordering::Greater
        );
    }

    #[test]
    fn keeps_non_numeric_input_as_qualifier() {
        let parsed = ParsedVersion::parse("  trunk ");
        assert_eq!(parsed.segments().count(), 0);
        assert_eq!(parsed.qualifier(), "trunk");
        assert_eq!(compare_versions("trunk", "trunk"), Ordering::Equal);
    }

    #[test]
    fn is_at_least_is_inclusive() {
        assert!(is_at_least("1.10", "1.10"));
        assert!(is_at_least("1.10.1", "1.10"));
        assert!(!is_at_least("1.9.9", "1.10"));
    }

    #[test]
    fn non_ascii_digits_are_not_numeric_segments() {
        let parsed = ParsedVersion::parse("\u{661}.0");
        assert_eq!(parsed.segments().count(), 0);
        assert_eq!(parsed.qualifier(), "\u{661}.0");

        assert_eq!(compare_versions("\u{661}.0", "9.0"), Ordering::Less);
        assert!(!is_at_least("\u{661}", "5"));
    }
}
