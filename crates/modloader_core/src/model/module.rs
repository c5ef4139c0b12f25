//! Runtime module entity.
//!
//! # Responsibility
//! - Own one `ModuleDescriptor` for the lifetime of the loaded artifact.
//! - Hold resolved `extensions` and declared `extension_names` behind one
//!   per-module lock.
//!
//! # Invariants
//! - Identity is the `Arc` allocation: equal descriptors are still distinct
//!   modules.
//! - Extension state is only mutated while the module lock is held.
//! - `extension_names` starts as the descriptor's extension declarations,
//!   each with its own freshly allocated point id.

use crate::extension::{Extension, ExtensionNames, ExtensionResolver, PointId};
use crate::model::descriptor::ModuleDescriptor;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

pub(crate) struct ExtensionState {
    pub(crate) extensions: Vec<Extension>,
    pub(crate) extension_names: Option<ExtensionNames>,
    /// Point ids the stored extensions were last expanded from.
    pub(crate) expanded_for: Option<Vec<PointId>>,
}

/// Loaded module: descriptor plus lazily resolved extensions.
pub struct Module {
    instance_id: Uuid,
    descriptor: ModuleDescriptor,
    state: Mutex<ExtensionState>,
}

impl Module {
    /// Attaches `descriptor` to a new module entity.
    ///
    /// Advice points declared by the descriptor are bound to the returned
    /// module as their owner.
    pub fn new(mut descriptor: ModuleDescriptor) -> Arc<Self> {
        let extension_names = ExtensionNames::from_declarations(&descriptor.extensions);
        Arc::new_cyclic(|owner| {
            descriptor.bind_owner(owner);
            Self {
                instance_id: Uuid::new_v4(),
                descriptor,
                state: Mutex::new(ExtensionState {
                    extensions: Vec::new(),
                    extension_names: Some(extension_names),
                    expanded_for: None,
                }),
            }
        })
    }

    /// Creates a module with an otherwise empty descriptor.
    pub fn with_id(module_id: impl Into<String>) -> Arc<Self> {
        Self::new(ModuleDescriptor::new(module_id))
    }

    pub fn module_id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    /// Per-load handle used to tell apart reloads of the same module id.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Reference identity comparison.
    pub fn same_as(&self, other: &Module) -> bool {
        std::ptr::eq(self, other)
    }

    /// Returns the currently stored extensions without expanding.
    pub fn extensions(&self) -> Vec<Extension> {
        self.lock_extension_state().extensions.clone()
    }

    /// Replaces stored extensions, bypassing resolution.
    pub fn set_extensions(&self, extensions: Vec<Extension>) {
        let mut state = self.lock_extension_state();
        state.extensions = extensions;
        state.expanded_for = None;
    }

    /// Returns a copy of the declared names; point ids keep their identity.
    pub fn extension_names(&self) -> Option<ExtensionNames> {
        self.lock_extension_state().extension_names.clone()
    }

    pub fn set_extension_names(&self, extension_names: Option<ExtensionNames>) {
        let mut state = self.lock_extension_state();
        state.extension_names = extension_names;
        state.expanded_for = None;
    }

    /// Reconciles extensions against declared names and returns the result.
    pub fn expand_extensions(&self, resolver: &ExtensionResolver) -> Vec<Extension> {
        resolver.get_extensions(self)
    }

    // Every writer replaces whole fields, so a poisoned lock still guards
    // consistent data.
    pub(crate) fn lock_extension_state(&self) -> MutexGuard<'_, ExtensionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Debug for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("id", &self.descriptor.id)
            .field("version", &self.descriptor.version)
            .field("instance_id", &self.instance_id)
            .finish_non_exhaustive()
    }
}
