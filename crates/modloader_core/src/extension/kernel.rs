//! Extension type loading contracts and the in-process type registry.
//!
//! # Responsibility
//! - Define `InstanceFactory`, the module-scoped type loading capability.
//! - Define `LoaderProvider`, which hands out a factory per active module.
//! - Provide `TypeRegistry` and `ModuleLoaders` as the default in-process
//!   implementations.
//!
//! # Invariants
//! - Registered type names are fully qualified (`seg(.seg)*`) and unique.
//! - A module without an active loader yields no factory; callers treat
//!   that as a per-entry load failure.

use crate::extension::instance::ExtensionContent;
use crate::model::module::Module;
use log::info;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::{Arc, PoisonError, RwLock};

pub type LoadResult<T> = Result<T, LoadError>;

type Constructor = Box<dyn Fn() -> Result<Arc<dyn ExtensionContent>, String> + Send + Sync>;

/// Creates extension implementations by type name.
///
/// `create` runs while the requesting module's extension lock is held.
/// Implementations must not call `Module::extensions`, `set_extensions`,
/// `extension_names`, `set_extension_names` or `expand_extensions` on that
/// module: the lock is not re-entrant and the call deadlocks. The module's
/// id and descriptor stay readable.
pub trait InstanceFactory: Send + Sync {
    fn create(&self, type_name: &str) -> LoadResult<Arc<dyn ExtensionContent>>;
}

/// Supplies the type loading scope of one module.
///
/// Called under the same lock as `InstanceFactory::create`, with the same
/// restrictions on touching the module's extension state.
pub trait LoaderProvider: Send + Sync {
    /// Returns `None` when the module is not currently active.
    fn loader_for(&self, module: &Module) -> Option<Arc<dyn InstanceFactory>>;
}

/// Registry of constructible extension implementation types.
#[derive(Default)]
pub struct TypeRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor under a fully qualified type name.
    pub fn register<F>(&mut self, type_name: &str, constructor: F) -> Result<(), ExtensionKernelError>
    where
        F: Fn() -> Result<Arc<dyn ExtensionContent>, String> + Send + Sync + 'static,
    {
        let type_name = type_name.trim();
        if !is_valid_type_name(type_name) {
            return Err(ExtensionKernelError::InvalidTypeName(type_name.to_string()));
        }
        if self.constructors.contains_key(type_name) {
            return Err(ExtensionKernelError::DuplicateTypeName(
                type_name.to_string(),
            ));
        }

        self.constructors
            .insert(type_name.to_string(), Box::new(constructor));
        Ok(())
    }

    /// Registers a type built through its `Default` implementation.
    pub fn register_default<T>(&mut self, type_name: &str) -> Result<(), ExtensionKernelError>
    where
        T: ExtensionContent + Default + 'static,
    {
        self.register(type_name, || {
            Ok(Arc::new(T::default()) as Arc<dyn ExtensionContent>)
        })
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name.trim())
    }

    /// Returns sorted registered type names.
    pub fn type_names(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }
}

impl InstanceFactory for TypeRegistry {
    fn create(&self, type_name: &str) -> LoadResult<Arc<dyn ExtensionContent>> {
        let type_name = type_name.trim();
        let constructor = self
            .constructors
            .get(type_name)
            .ok_or_else(|| LoadError::TypeNotFound(type_name.to_string()))?;
        constructor().map_err(|reason| LoadError::ConstructionFailed {
            type_name: type_name.to_string(),
            reason,
        })
    }
}

impl Debug for TypeRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Active module loaders keyed by module id.
#[derive(Default)]
pub struct ModuleLoaders {
    loaders: RwLock<BTreeMap<String, Arc<dyn InstanceFactory>>>,
}

impl ModuleLoaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `factory` the type loading scope of `module_id`.
    ///
    /// Re-activating a module replaces its previous factory.
    pub fn activate(
        &self,
        module_id: &str,
        factory: Arc<dyn InstanceFactory>,
    ) -> Result<(), ExtensionKernelError> {
        let module_id = module_id.trim();
        if module_id.is_empty() {
            return Err(ExtensionKernelError::InvalidModuleId(module_id.to_string()));
        }

        let replaced = self
            .loaders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(module_id.to_string(), factory)
            .is_some();
        info!(
            "event=loader_activate module=extension status=ok module_id={} replaced={}",
            module_id, replaced
        );
        Ok(())
    }

    /// Removes the loader of `module_id`; returns whether one was active.
    pub fn deactivate(&self, module_id: &str) -> bool {
        let removed = self
            .loaders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(module_id.trim())
            .is_some();
        info!(
            "event=loader_deactivate module=extension status={} module_id={}",
            if removed { "ok" } else { "skip" },
            module_id.trim()
        );
        removed
    }

    pub fn is_active(&self, module_id: &str) -> bool {
        self.loaders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(module_id.trim())
    }
}

impl LoaderProvider for ModuleLoaders {
    fn loader_for(&self, module: &Module) -> Option<Arc<dyn InstanceFactory>> {
        self.loaders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(module.module_id())
            .cloned()
    }
}

fn is_valid_type_name(value: &str) -> bool {
    !value.is_empty() && value.split('.').all(is_valid_type_segment)
}

fn is_valid_type_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Failure to materialize one extension implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    LoaderUnavailable(String),
    TypeNotFound(String),
    ConstructionFailed { type_name: String, reason: String },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoaderUnavailable(module_id) => {
                write!(f, "no active type loader for module: {module_id}")
            }
            Self::TypeNotFound(value) => write!(f, "extension type not found: {value}"),
            Self::ConstructionFailed { type_name, reason } => {
                write!(f, "extension type {type_name} failed to construct: {reason}")
            }
        }
    }
}

impl Error for LoadError {}

/// Registration errors for types and module loaders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionKernelError {
    InvalidTypeName(String),
    DuplicateTypeName(String),
    InvalidModuleId(String),
}

impl Display for ExtensionKernelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTypeName(value) => write!(f, "extension type name is invalid: {value}"),
            Self::DuplicateTypeName(value) => {
                write!(f, "extension type already registered: {value}")
            }
            Self::InvalidModuleId(value) => write!(f, "module id is invalid: `{value}`"),
        }
    }
}

impl Error for ExtensionKernelError {}

#[cfg(test)]
mod tests {
    use super::{
        ExtensionKernelError, InstanceFactory, LoadError, LoaderProvider, ModuleLoaders,
        TypeRegistry,
    };
    use crate::extension::instance::{ExtensionContent, MediaType};
    use crate::model::module::Module;
    use std::sync::Arc;

    #[derive(Default)]
    struct Sidebar;

    impl ExtensionContent for Sidebar {
        fn media_type(&self) -> Option<MediaType> {
            Some(MediaType::Html)
        }
    }

    #[test]
    fn creates_registered_types() {
        let mut registry = TypeRegistry::new();
        registry
            .register_default::<Sidebar>("org.example.ui.Sidebar")
            .expect("sidebar registration");

        let content = registry
            .create("org.example.ui.Sidebar")
            .expect("registered type should construct");
        assert_eq!(content.media_type(), Some(MediaType::Html));
        assert_eq!(registry.type_names(), vec!["org.example.ui.Sidebar"]);
    }

    #[test]
    fn rejects_invalid_type_names() {
        let mut registry = TypeRegistry::new();
        for name in ["", "org..Sidebar", "org.example.1Sidebar", "org example", "org."] {
            let err = registry
                .register_default::<Sidebar>(name)
                .expect_err("invalid type name must be rejected");
            assert!(matches!(err, ExtensionKernelError::InvalidTypeName(_)));
        }
        registry
            .register_default::<Sidebar>("org.example.Outer$Inner_2")
            .expect("nested type names are valid");
    }

    #[test]
    fn rejects_duplicate_type_names() {
        let mut registry = TypeRegistry::new();
        registry
            .register_default::<Sidebar>("org.example.Sidebar")
            .expect("first registration");
        let err = registry
            .register_default::<Sidebar>(" org.example.Sidebar ")
            .expect_err("duplicate registration must fail");
        assert_eq!(
            err,
            ExtensionKernelError::DuplicateTypeName("org.example.Sidebar".to_string())
        );
    }

    #[test]
    fn reports_missing_and_failing_types() {
        let mut registry = TypeRegistry::new();
        registry
            .register("org.example.Broken", || Err("missing template".to_string()))
            .expect("broken type registration");

        let missing = registry.create("org.example.Unknown").err();
        assert_eq!(
            missing,
            Some(LoadError::TypeNotFound("org.example.Unknown".to_string()))
        );

        let broken = registry.create("org.example.Broken").err();
        assert_eq!(
            broken,
            Some(LoadError::ConstructionFailed {
                type_name: "org.example.Broken".to_string(),
                reason: "missing template".to_string(),
            })
        );
    }

    #[test]
    fn provides_loaders_only_for_active_modules() {
        let loaders = ModuleLoaders::new();
        let module = Module::with_id("uiframework");
        assert!(loaders.loader_for(&module).is_none());

        loaders
            .activate("uiframework", Arc::new(TypeRegistry::new()))
            .expect("activation");
        assert!(loaders.is_active("uiframework"));
        assert!(loaders.loader_for(&module).is_some());

        assert!(loaders.deactivate("uiframework"));
        assert!(!loaders.deactivate("uiframework"));
        assert!(loaders.loader_for(&module).is_none());
    }

    #[test]
    fn rejects_blank_module_id_on_activation() {
        let loaders = ModuleLoaders::new();
        let err = loaders
            .activate("  ", Arc::new(TypeRegistry::new()))
            .expect_err("blank module id must be rejected");
        assert!(matches!(err, ExtensionKernelError::InvalidModuleId(_)));
    }
}
