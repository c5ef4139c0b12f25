//! Required-version constraint matching.
//!
//! Supported constraint shapes:
//! - plain minimum: `1.9` (inclusive)
//! - wildcard: `1.9.*` (any version with the `1.9` prefix)
//! - inclusive range: `1.9 - 1.10.*` (either bound may use a wildcard)

use super::compare::{compare_versions, is_at_least, ParsedVersion};
use std::cmp::Ordering;

const RANGE_SEPARATOR: &str = " - ";
const WILDCARD: char = '*';

/// Returns whether `version` satisfies `constraint`.
///
/// A blank constraint is always satisfied.
pub fn matches_required_version(version: &str, constraint: &str) -> bool {
    let constraint = constraint.trim();
    if constraint.is_empty() {
        return true;
    }

    match constraint.split_once(RANGE_SEPARATOR) {
        Some((lower, upper)) => {
            satisfies_lower(version, lower.trim()) && satisfies_upper(version, upper.trim())
        }
        None if is_wildcard(constraint) => {
            let prefix = ParsedVersion::parse(wildcard_prefix(constraint));
            let version = ParsedVersion::parse(version);
            version.cmp_numeric_prefix(&prefix, prefix.segment_count()) == Ordering::Equal
        }
        None => is_at_least(version, constraint),
    }
}

fn satisfies_lower(version: &str, lower: &str) -> bool {
    if is_wildcard(lower) {
        return is_at_least(version, wildcard_prefix(lower));
    }
    is_at_least(version, lower)
}

fn satisfies_upper(version: &str, upper: &str) -> bool {
    if is_wildcard(upper) {
        let prefix = ParsedVersion::parse(wildcard_prefix(upper));
        let version = ParsedVersion::parse(version);
        return version.cmp_numeric_prefix(&prefix, prefix.segment_count()) != Ordering::Greater;
    }
    compare_versions(version, upper) != Ordering::Greater
}

fn is_wildcard(value: &str) -> bool {
    value.ends_with(WILDCARD)
}

fn wildcard_prefix(value: &str) -> &str {
    value.trim_end_matches(WILDCARD).trim_end_matches('.')
}
