//! Loader configuration.
//!
//! # Invariants
//! - `descriptor_file_name` is a bare, non-empty file name.
//! - `platform_version` is non-empty; it is the version conditional resources
//!   and `require_version` are checked against.

use crate::environment::PlatformVersionSource;

/// Manifest file name inside an unpacked module directory.
pub const DEFAULT_DESCRIPTOR_FILE_NAME: &str = "config.xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    descriptor_file_name: String,
    platform_version: String,
}

impl LoaderConfig {
    /// Builds a normalized config.
    ///
    /// # Errors
    /// - `descriptor_file_name` is blank or contains a path separator.
    /// - `platform_version` is blank.
    pub fn new(descriptor_file_name: &str, platform_version: &str) -> Result<Self, String> {
        Ok(Self {
            descriptor_file_name: normalize_file_name(descriptor_file_name)?,
            platform_version: normalize_platform_version(platform_version)?,
        })
    }

    /// Default file name with the given platform version.
    pub fn for_platform(platform_version: &str) -> Result<Self, String> {
        Self::new(DEFAULT_DESCRIPTOR_FILE_NAME, platform_version)
    }

    pub fn descriptor_file_name(&self) -> &str {
        &self.descriptor_file_name
    }
}

// The platform version falls back to this crate's own version; anything that
// evaluates real modules should build the config with `for_platform`.
impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            descriptor_file_name: DEFAULT_DESCRIPTOR_FILE_NAME.to_string(),
            platform_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl PlatformVersionSource for LoaderConfig {
    fn platform_version(&self) -> String {
        self.platform_version.clone()
    }
}

fn normalize_file_name(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("descriptor_file_name cannot be empty".to_string());
    }
    if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
        return Err(format!(
            "descriptor_file_name must be a bare file name, got `{trimmed}`"
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_platform_version(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("platform_version cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}
