use super::store::ArtifactStore;
use crate::config::LoaderConfig;
use crate::environment::InstalledModules;
use crate::model::module::Module;
use crate::parser::{parse_descriptor_bytes, DescriptorError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub type LoadModuleResult<T> = Result<T, ModuleLoadError>;

/// Reasons a module artifact cannot be loaded.
#[derive(Debug)]
pub enum ModuleLoadError {
    Io { location: PathBuf, source: io::Error },
    Descriptor { location: PathBuf, source: DescriptorError },
}

impl Display for ModuleLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { location, source } => write!(
                f,
                "failed to read module descriptor at `{}`: {source}",
                location.display()
            ),
            Self::Descriptor { location, source } => write!(
                f,
                "invalid module descriptor at `{}`: {source}",
                location.display()
            ),
        }
    }
}

impl Error for ModuleLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Descriptor { source, .. } => Some(source),
        }
    }
}

/// Loads module artifacts into `Module` entities.
#[derive(Debug, Clone)]
pub struct ModuleLoader<S> {
    store: S,
    config: LoaderConfig,
}

impl<S: ArtifactStore> ModuleLoader<S> {
    pub fn new(store: S, config: LoaderConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Reads, parses and attaches the descriptor found at `location`.
    ///
    /// # Side effects
    /// - Emits `module_load` logging events with duration and status.
    pub fn load(&self, location: &Path) -> LoadModuleResult<Arc<Module>> {
        let started_at = Instant::now();
        info!(
            "event=module_load module=loader status=start location={}",
            location.display()
        );

        let bytes = self.store.descriptor_bytes(location).map_err(|source| {
            error!(
                "event=module_load module=loader status=error location={} duration_ms={} error_code=descriptor_read_failed error={}",
                location.display(),
                started_at.elapsed().as_millis(),
                source
            );
            ModuleLoadError::Io {
                location: location.to_path_buf(),
                source,
            }
        })?;

        let descriptor = parse_descriptor_bytes(&bytes).map_err(|source| {
            error!(
                "event=module_load module=loader status=error location={} duration_ms={} error_code=descriptor_invalid error={}",
                location.display(),
                started_at.elapsed().as_millis(),
                source
            );
            ModuleLoadError::Descriptor {
                location: location.to_path_buf(),
                source,
            }
        })?;

        if !descriptor.supports_platform(&self.config) {
            warn!(
                "event=module_load module=loader status=warn module_id={} reason=platform_requirement_unmet required={}",
                descriptor.id,
                descriptor.require_platform_version.as_deref().unwrap_or_default()
            );
        }

        let module = Module::new(descriptor);
        info!(
            "event=module_load module=loader status=ok module_id={} instance_id={} duration_ms={}",
            module.module_id(),
            module.instance_id(),
            started_at.elapsed().as_millis()
        );
        Ok(module)
    }

    /// Packaged paths of `module` to exclude under this loader's platform.
    pub fn inactive_resource_paths(
        &self,
        module: &Module,
        installed: &dyn InstalledModules,
    ) -> Vec<String> {
        module
            .descriptor()
            .inactive_resource_paths(&self.config, installed)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
