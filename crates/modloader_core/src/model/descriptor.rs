//! Parsed module manifest content.
//!
//! # Responsibility
//! - Hold the validated result of descriptor parsing.
//! - Answer conditional-resource activation questions against a runtime
//!   environment.
//!
//! # Invariants
//! - Sequences keep document order; nothing is sorted or deduplicated.
//! - `ConditionalResource` equality is structural over all of its fields.
//! - `AdvicePoint` owners are weak; a descriptor never keeps its module alive.

use crate::environment::{InstalledModules, PlatformVersionSource};
use crate::model::module::Module;
use crate::version::matches_required_version;
use serde::Serialize;
use std::sync::{Arc, Weak};

/// Validated manifest content for one module artifact.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModuleDescriptor {
    /// Stable module identifier, never blank.
    pub id: String,
    pub name: String,
    pub author: String,
    pub description: String,
    pub version: String,
    /// Grammar tag taken from the root `configVersion` attribute.
    pub config_version: String,
    pub package_name: Option<String>,
    pub activator: Option<String>,
    /// Platform version constraint from `<require_version>`.
    pub require_platform_version: Option<String>,
    pub required_modules: Vec<RequiredModule>,
    pub aware_of_modules: Vec<RequiredModule>,
    pub conditional_resources: Vec<ConditionalResource>,
    pub advice_points: Vec<AdvicePoint>,
    pub privileges: Vec<PrivilegeDeclaration>,
    pub extensions: Vec<ExtensionDeclaration>,
    pub global_properties: Vec<GlobalPropertyDeclaration>,
}

impl ModuleDescriptor {
    /// Creates an otherwise empty descriptor for `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Returns whether the platform satisfies `require_platform_version`.
    pub fn supports_platform(&self, platform: &dyn PlatformVersionSource) -> bool {
        match self.require_platform_version.as_deref() {
            Some(constraint) => {
                matches_required_version(&platform.platform_version(), constraint)
            }
            None => true,
        }
    }

    /// Conditional resources whose constraints currently hold.
    pub fn active_conditional_resources(
        &self,
        platform: &dyn PlatformVersionSource,
        installed: &dyn InstalledModules,
    ) -> Vec<&ConditionalResource> {
        self.conditional_resources
            .iter()
            .filter(|resource| resource.is_active(platform, installed))
            .collect()
    }

    /// Paths of packaged files that must be excluded for this environment.
    pub fn inactive_resource_paths(
        &self,
        platform: &dyn PlatformVersionSource,
        installed: &dyn InstalledModules,
    ) -> Vec<&str> {
        self.conditional_resources
            .iter()
            .filter(|resource| !resource.is_active(platform, installed))
            .map(|resource| resource.path.as_str())
            .collect()
    }

    pub(crate) fn bind_owner(&mut self, owner: &Weak<Module>) {
        for advice in &mut self.advice_points {
            advice.owner = owner.clone();
        }
    }
}

/// Module id plus version constraint pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredModule {
    pub module_id: String,
    pub version: String,
}

impl RequiredModule {
    pub fn new(module_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            version: version.into(),
        }
    }

    /// Returns whether the module is installed at a satisfying version.
    pub fn is_satisfied_by(&self, installed: &dyn InstalledModules) -> bool {
        installed
            .installed_version(&self.module_id)
            .is_some_and(|version| matches_required_version(&version, &self.version))
    }
}

/// Packaged file whose inclusion depends on platform and peer versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionalResource {
    pub path: String,
    pub min_platform_version: Option<String>,
    pub required_modules: Vec<RequiredModule>,
}

impl ConditionalResource {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            min_platform_version: None,
            required_modules: Vec::new(),
        }
    }

    pub fn with_platform_version(mut self, version: impl Into<String>) -> Self {
        self.min_platform_version = Some(version.into());
        self
    }

    pub fn with_required_module(
        mut self,
        module_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.required_modules
            .push(RequiredModule::new(module_id, version));
        self
    }

    /// Returns whether this resource should be included.
    ///
    /// Absent constraints never deactivate a resource.
    pub fn is_active(
        &self,
        platform: &dyn PlatformVersionSource,
        installed: &dyn InstalledModules,
    ) -> bool {
        let platform_ok = match self.min_platform_version.as_deref() {
            Some(constraint) => {
                matches_required_version(&platform.platform_version(), constraint)
            }
            None => true,
        };
        platform_ok
            && self
                .required_modules
                .iter()
                .all(|required| required.is_satisfied_by(installed))
    }
}

/// Interception hook declared by a module.
#[derive(Debug, Clone, Serialize)]
pub struct AdvicePoint {
    /// Join point identifier (`<point>`).
    pub point: String,
    /// Implementation type name (`<class>`).
    pub class_name: String,
    #[serde(skip)]
    owner: Weak<Module>,
}

impl AdvicePoint {
    pub fn new(
        point: impl Into<String>,
        class_name: impl Into<String>,
        owner: Weak<Module>,
    ) -> Self {
        Self {
            point: point.into(),
            class_name: class_name.into(),
            owner,
        }
    }

    /// Returns the declaring module while it is still loaded.
    pub fn owning_module(&self) -> Option<Arc<Module>> {
        self.owner.upgrade()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivilegeDeclaration {
    pub name: String,
    pub description: String,
}

/// Declared extension point to implementation type mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionDeclaration {
    pub point: String,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalPropertyDeclaration {
    pub property: String,
    pub default_value: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{ConditionalResource, ModuleDescriptor};
    use crate::environment::RuntimeEnvironment;

    fn descriptor_with_resources() -> ModuleDescriptor {
        let mut descriptor = ModuleDescriptor::new("reportingcompat");
        descriptor.conditional_resources = vec![
            ConditionalResource::new("/lib/api-1.9*").with_platform_version("1.9"),
            ConditionalResource::new("/lib/api-1.10*").with_platform_version("1.10"),
            ConditionalResource::new("/lib/mapping-bridge*")
                .with_required_module("metadatamapping", "1.0"),
        ];
        descriptor
    }

    #[test]
    fn resource_without_constraints_is_always_active() {
        let env = RuntimeEnvironment::new("0.1");
        assert!(ConditionalResource::new("/lib/plain.jar").is_active(&env, &env));
    }

    #[test]
    fn platform_constraint_gates_resources() {
        let descriptor = descriptor_with_resources();
        let env = RuntimeEnvironment::new("1.9.4");

        let inactive = descriptor.inactive_resource_paths(&env, &env);
        assert_eq!(inactive, vec!["/lib/api-1.10*", "/lib/mapping-bridge*"]);
    }

    #[test]
    fn required_module_must_be_installed_at_minimum_version() {
        let descriptor = descriptor_with_resources();
        let too_old = RuntimeEnvironment::new("1.10").with_module("metadatamapping", "0.9");
        assert_eq!(descriptor.active_conditional_resources(&too_old, &too_old).len(), 2);

        let current = RuntimeEnvironment::new("1.10").with_module("metadatamapping", "1.0.2");
        let active = descriptor.active_conditional_resources(&current, &current);
        assert_eq!(active.len(), 3);
        assert_eq!(active[2].path, "/lib/mapping-bridge*");
    }

    #[test]
    fn platform_requirement_uses_constraint_matching() {
        let mut descriptor = ModuleDescriptor::new("legacyui");
        assert!(descriptor.supports_platform(&RuntimeEnvironment::new("1.0")));

        descriptor.require_platform_version = Some("1.9.* - 1.11.*".to_string());
        assert!(descriptor.supports_platform(&RuntimeEnvironment::new("1.11.3")));
        assert!(!descriptor.supports_platform(&RuntimeEnvironment::new("2.0")));
    }

    #[test]
    fn conditional_resource_equality_is_structural() {
        let left = ConditionalResource::new("/lib/a*")
            .with_platform_version("1.9")
            .with_required_module("reporting", "2.0");
        let right = ConditionalResource::new("/lib/a*")
            .with_platform_version("1.9")
            .with_required_module("reporting", "2.0");
        assert_eq!(left, right);
        assert_ne!(left, right.clone().with_required_module("idgen", "1.0"));
    }
}
