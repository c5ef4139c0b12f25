//! Extension declaration, loading and expansion.
//!
//! This module turns a module's declared point id to type name mapping into
//! live extension instances. Type loading goes through `InstanceFactory`
//! implementations scoped to the owning module; the in-process
//! `TypeRegistry` is the default factory.

pub mod instance;
pub mod kernel;
pub mod point;
pub mod resolver;

pub use instance::{Extension, ExtensionContent, MediaType};
pub use kernel::{
    ExtensionKernelError, InstanceFactory, LoadError, LoadResult, LoaderProvider, ModuleLoaders,
    TypeRegistry,
};
pub use point::{ExtensionNames, PointId};
pub use resolver::ExtensionResolver;
