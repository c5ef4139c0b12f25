//! Module descriptor model and runtime module entity.
//!
//! # Responsibility
//! - Define the parsed, value-like manifest content (`ModuleDescriptor`).
//! - Define the `Module` entity that owns a descriptor plus extension state.
//!
//! # Invariants
//! - A descriptor is immutable once attached to its `Module`.
//! - Modules are compared by reference identity, never by content.

pub mod descriptor;
pub mod module;
