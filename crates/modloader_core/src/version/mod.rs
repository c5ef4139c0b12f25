//! Version ordering and constraint matching.
//!
//! # Responsibility
//! - Order dotted numeric version strings with optional qualifiers.
//! - Decide whether a version satisfies a declared constraint.
//!
//! # Invariants
//! - Every function here is pure; results never depend on call order.
//! - Malformed input never fails, it only orders differently.

mod compare;
mod constraint;

pub use compare::{compare_versions, is_at_least, ParsedVersion};
pub use constraint::matches_required_version;
