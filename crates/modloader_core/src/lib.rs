//! Module descriptor ingestion and extension resolution.
//! This crate parses module manifests into validated descriptors and lazily
//! materializes the extensions a module declares.

pub mod config;
pub mod environment;
pub mod extension;
pub mod loader;
pub mod logging;
pub mod model;
pub mod parser;
pub mod version;

pub use config::{LoaderConfig, DEFAULT_DESCRIPTOR_FILE_NAME};
pub use environment::{InstalledModules, PlatformVersionSource, RuntimeEnvironment};
pub use extension::{
    Extension, ExtensionContent, ExtensionKernelError, ExtensionNames, ExtensionResolver,
    InstanceFactory, LoadError, LoadResult, LoaderProvider, MediaType, ModuleLoaders, PointId,
    TypeRegistry,
};
pub use loader::{
    ArtifactStore, DirectoryArtifactStore, LoadModuleResult, ModuleLoadError, ModuleLoader,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::descriptor::{
    AdvicePoint, ConditionalResource, ExtensionDeclaration, GlobalPropertyDeclaration,
    ModuleDescriptor, PrivilegeDeclaration, RequiredModule,
};
pub use model::module::Module;
pub use parser::{parse_descriptor, parse_descriptor_bytes, DescriptorError, DescriptorResult};
pub use version::{compare_versions, is_at_least, matches_required_version};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
