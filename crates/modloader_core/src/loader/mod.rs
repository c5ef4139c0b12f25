//! Module artifact loading.
//!
//! # Responsibility
//! - Fetch descriptor bytes through an `ArtifactStore`.
//! - Parse them into a `ModuleDescriptor` and attach it to a new `Module`.
//!
//! # Invariants
//! - I/O failures abort loading before parsing starts.
//! - A fatal descriptor error means no `Module` is created.
//!
//! # See also
//! - `crate::parser` for descriptor validation rules.

mod module_loader;
mod store;

pub use module_loader::{LoadModuleResult, ModuleLoadError, ModuleLoader};
pub use store::{ArtifactStore, DirectoryArtifactStore};
