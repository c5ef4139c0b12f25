//! Lazy extension expansion.
//!
//! # Responsibility
//! - Reconcile a module's resolved `extensions` with its declared
//!   `extension_names`.
//! - Instantiate declared extensions through the module's type loader.
//!
//! # Invariants
//! - Expansion never fails as a whole; an entry that cannot be loaded is
//!   skipped and logged.
//! - Point id snapshots are compared by identity, never by text.
//! - Each declared entry is attempted once per set of declared names; entries
//!   that failed are not retried until the names or extensions are replaced.
//! - The check and the mutation happen under the module lock, so one module
//!   never instantiates concurrently.

use crate::extension::instance::Extension;
use crate::extension::kernel::{LoadError, LoaderProvider};
use crate::extension::point::{ExtensionNames, IdentityKey, PointId};
use crate::model::module::Module;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Materializes declared extensions for modules on demand.
#[derive(Clone)]
pub struct ExtensionResolver {
    loaders: Arc<dyn LoaderProvider>,
}

impl ExtensionResolver {
    pub fn new(loaders: Arc<dyn LoaderProvider>) -> Self {
        Self { loaders }
    }

    /// Returns the module's extensions, expanding declared names if needed.
    ///
    /// - No declared names: stored extensions are returned unchanged.
    /// - Stored extensions already cover exactly the declared point ids (by
    ///   identity): stored extensions are returned unchanged.
    /// - The current names were already expanded once (some entries may have
    ///   failed): stored extensions are returned unchanged.
    /// - Otherwise stored extensions are replaced with every declared entry
    ///   that could be instantiated, possibly none.
    pub fn get_extensions(&self, module: &Module) -> Vec<Extension> {
        let mut guard = module.lock_extension_state();
        let state = &mut *guard;

        let names = match state.extension_names.as_ref() {
            Some(names) if !names.is_empty() => names,
            _ => return state.extensions.clone(),
        };
        if extensions_match_names(&state.extensions, names)
            || expanded_from(state.expanded_for.as_deref(), names)
        {
            debug!(
                "event=extension_expand module=extension status=skip module_id={} reason=up_to_date count={}",
                module.module_id(),
                state.extensions.len()
            );
            return state.extensions.clone();
        }

        // Without an active loader nothing was attempted; expand again once
        // the module is activated.
        let (expanded, expanded_for) = match self.instantiate_declared(module, names) {
            Some(expanded) => {
                let points: Vec<PointId> = names.iter().map(|(point, _)| point.clone()).collect();
                (expanded, Some(points))
            }
            None => (Vec::new(), None),
        };
        state.expanded_for = expanded_for;
        state.extensions = expanded.clone();
        expanded
    }

    fn instantiate_declared(
        &self,
        module: &Module,
        names: &ExtensionNames,
    ) -> Option<Vec<Extension>> {
        let started_at = Instant::now();
        let Some(loader) = self.loaders.loader_for(module) else {
            let err = LoadError::LoaderUnavailable(module.module_id().to_string());
            warn!(
                "event=extension_expand module=extension status=skip module_id={} declared={} error={}",
                module.module_id(),
                names.len(),
                err
            );
            return None;
        };

        let mut extensions = Vec::with_capacity(names.len());
        for (point, type_name) in names.iter() {
            match loader.create(type_name) {
                Ok(content) => extensions.push(
                    Extension::new(type_name, content)
                        .with_point_id(point.clone())
                        .with_module_id(module.module_id()),
                ),
                Err(err) => warn!(
                    "event=extension_instantiate module=extension status=skip module_id={} point={} error={}",
                    module.module_id(),
                    point,
                    err
                ),
            }
        }

        info!(
            "event=extension_expand module=extension status=ok module_id={} declared={} resolved={} duration_ms={}",
            module.module_id(),
            names.len(),
            extensions.len(),
            started_at.elapsed().as_millis()
        );
        Some(extensions)
    }
}

fn extensions_match_names(extensions: &[Extension], names: &ExtensionNames) -> bool {
    let mut resolved = HashSet::with_capacity(extensions.len());
    for extension in extensions {
        // An untagged extension can never correspond to a declared entry.
        let Some(point) = extension.point_id() else {
            return false;
        };
        resolved.insert(IdentityKey(point));
    }
    resolved == names.identity_keys()
}

// Entries that failed to load leave `extensions` short of the declared
// names; the recorded point ids keep that outcome from being retried.
fn expanded_from(expanded_for: Option<&[PointId]>, names: &ExtensionNames) -> bool {
    let Some(expanded_for) = expanded_for else {
        return false;
    };
    let recorded: HashSet<IdentityKey<'_>> = expanded_for.iter().map(IdentityKey).collect();
    recorded == names.identity_keys()
}
