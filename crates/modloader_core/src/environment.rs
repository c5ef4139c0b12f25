//! Runtime environment contracts used by activation checks.
//!
//! # Responsibility
//! - Supply the running platform version.
//! - Supply versions of other installed modules.
//!
//! Implementations live outside this crate; `RuntimeEnvironment` is the
//! static in-memory variant used by the CLI and tests.

use std::collections::BTreeMap;

/// Source of the running platform version.
pub trait PlatformVersionSource {
    fn platform_version(&self) -> String;
}

/// Lookup of modules installed next to the one being loaded.
pub trait InstalledModules {
    fn installed_version(&self, module_id: &str) -> Option<String>;
}

/// Fixed platform version plus a set of installed module versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeEnvironment {
    platform_version: String,
    installed: BTreeMap<String, String>,
}

impl RuntimeEnvironment {
    pub fn new(platform_version: impl Into<String>) -> Self {
        Self {
            platform_version: platform_version.into(),
            installed: BTreeMap::new(),
        }
    }

    pub fn with_module(mut self, module_id: &str, version: &str) -> Self {
        self.install(module_id, version);
        self
    }

    /// Records one installed module, replacing a previous version.
    pub fn install(&mut self, module_id: &str, version: &str) {
        self.installed
            .insert(module_id.trim().to_string(), version.trim().to_string());
    }

    pub fn uninstall(&mut self, module_id: &str) -> bool {
        self.installed.remove(module_id.trim()).is_some()
    }
}

impl PlatformVersionSource for RuntimeEnvironment {
    fn platform_version(&self) -> String {
        self.platform_version.clone()
    }
}

impl InstalledModules for RuntimeEnvironment {
    fn installed_version(&self, module_id: &str) -> Option<String> {
        self.installed.get(module_id.trim()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::{InstalledModules, PlatformVersionSource, RuntimeEnvironment};

    #[test]
    fn tracks_installed_modules() {
        let mut env = RuntimeEnvironment::new("2.4.0").with_module("reporting", "1.2");
        assert_eq!(env.platform_version(), "2.4.0");
        assert_eq!(env.installed_version(" reporting ").as_deref(), Some("1.2"));

        env.install("reporting", "1.3");
        assert_eq!(env.installed_version("reporting").as_deref(), Some("1.3"));

        assert!(env.uninstall("reporting"));
        assert!(env.installed_version("reporting").is_none());
        assert!(!env.uninstall("reporting"));
    }
}
