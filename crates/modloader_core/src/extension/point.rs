//! Extension point ids with reference identity.
//!
//! # Responsibility
//! - Give point ids a structural equality (`PartialEq`) and a separate
//!   identity equality (`PointId::same_as`).
//! - Store declared extensions keyed by point id identity.
//!
//! # Invariants
//! - Cloning a `PointId` shares the allocation, so clones are `same_as` each
//!   other.
//! - Two point ids built separately from equal text are never `same_as`.
//! - `ExtensionNames` keeps insertion order and one entry per identity.

use crate::model::descriptor::ExtensionDeclaration;
use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared extension point identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(Arc<str>);

impl PointId {
    /// Allocates a new point id; the result is not `same_as` any other.
    pub fn new(value: &str) -> Self {
        Self(Arc::from(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reference identity comparison.
    pub fn same_as(&self, other: &PointId) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn address(&self) -> *const u8 {
        Arc::as_ptr(&self.0).cast::<u8>()
    }
}

impl Debug for PointId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}

impl Display for PointId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash-set key comparing point ids by identity.
#[derive(Clone, Copy)]
pub(crate) struct IdentityKey<'a>(pub(crate) &'a PointId);

impl PartialEq for IdentityKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.same_as(other.0)
    }
}

impl Eq for IdentityKey<'_> {}

impl Hash for IdentityKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.0.address(), state);
    }
}

/// Declared point id to implementation type name mapping.
#[derive(Clone, Default)]
pub struct ExtensionNames {
    entries: Vec<(PointId, String)>,
}

impl ExtensionNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds names from descriptor declarations, one fresh point id each.
    pub fn from_declarations(declarations: &[ExtensionDeclaration]) -> Self {
        let mut names = Self::new();
        for declaration in declarations {
            names.declare(&declaration.point, &declaration.class_name);
        }
        names
    }

    /// Adds a new entry under a freshly allocated point id and returns it.
    pub fn declare(&mut self, point: &str, type_name: &str) -> PointId {
        let point = PointId::new(point);
        self.entries.push((point.clone(), type_name.to_string()));
        point
    }

    /// Inserts or replaces the entry for exactly this point id allocation.
    ///
    /// Returns the previous type name when the identical key was present.
    pub fn insert(&mut self, point: PointId, type_name: impl Into<String>) -> Option<String> {
        let type_name = type_name.into();
        match self.entries.iter_mut().find(|(key, _)| key.same_as(&point)) {
            Some((_, existing)) => Some(std::mem::replace(existing, type_name)),
            None => {
                self.entries.push((point, type_name));
                None
            }
        }
    }

    pub fn get(&self, point: &PointId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.same_as(point))
            .map(|(_, type_name)| type_name.as_str())
    }

    pub fn remove(&mut self, point: &PointId) -> Option<String> {
        let index = self.entries.iter().position(|(key, _)| key.same_as(point))?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PointId, &str)> {
        self.entries
            .iter()
            .map(|(point, type_name)| (point, type_name.as_str()))
    }

    pub(crate) fn identity_keys(&self) -> HashSet<IdentityKey<'_>> {
        self.entries.iter().map(|(point, _)| IdentityKey(point)).collect()
    }
}

impl Debug for ExtensionNames {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl FromIterator<(PointId, String)> for ExtensionNames {
    fn from_iter<I: IntoIterator<Item = (PointId, String)>>(iter: I) -> Self {
        let mut names = Self::new();
        for (point, type_name) in iter {
            names.insert(point, type_name);
        }
        names
    }
}
