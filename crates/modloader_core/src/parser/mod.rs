//! Module descriptor (`config.xml`) parsing.
//!
//! # Responsibility
//! - Turn a manifest document into a validated `ModuleDescriptor`.
//! - Keep two distinct validation policies apart: structural problems in
//!   `<conditionalResources>` are fatal, malformed additive entries
//!   (advice, privileges, extensions, global properties) are dropped.
//!
//! # Invariants
//! - Parsing is synchronous and holds no shared state.
//! - Whitespace between tags never changes the result.
//! - Sequences keep document order.

mod conditional;
mod entries;
mod error;
mod xml;

pub use conditional::parse_conditional_resources;
pub use entries::{
    parse_advice, parse_extensions, parse_global_properties, parse_module_list, parse_privileges,
};
pub use error::{DescriptorError, DescriptorResult};

use crate::model::descriptor::ModuleDescriptor;
use log::info;
use roxmltree::{Document, Node, ParsingOptions};
use std::sync::Weak;
use xml::{child_text, tag_name};

const ROOT_TAG: &str = "module";
const CONFIG_VERSION_ATTR: &str = "configVersion";
const BYTE_ORDER_MARK: char = '\u{feff}';

const SUPPORTED_CONFIG_VERSIONS: &[&str] = &["1.0", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6"];

/// Returns descriptor grammar versions accepted by `parse_descriptor`.
pub fn supported_config_versions() -> &'static [&'static str] {
    SUPPORTED_CONFIG_VERSIONS
}

/// Decodes and parses raw descriptor bytes.
///
/// Document type declarations are allowed but never fetched.
pub fn parse_descriptor_bytes(bytes: &[u8]) -> DescriptorResult<ModuleDescriptor> {
    let text = std::str::from_utf8(bytes)?;
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document =
        Document::parse_with_options(text.trim_start_matches(BYTE_ORDER_MARK), options)?;
    parse_descriptor(document.root_element())
}

/// Parses a full descriptor rooted at `<module>`.
///
/// Advice owners are left unbound; `Module::new` binds them.
///
/// # Errors
/// - Root tag other than `<module>`.
/// - Missing or unsupported `configVersion`.
/// - Missing or blank `<id>`.
/// - Any `<conditionalResources>` violation.
pub fn parse_descriptor(root: Node<'_, '_>) -> DescriptorResult<ModuleDescriptor> {
    if tag_name(root) != ROOT_TAG {
        return Err(DescriptorError::UnexpectedRoot(tag_name(root).to_string()));
    }

    let config_version = root
        .attribute(CONFIG_VERSION_ATTR)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(DescriptorError::MissingConfigVersion)?;
    if !SUPPORTED_CONFIG_VERSIONS.contains(&config_version) {
        return Err(DescriptorError::UnsupportedConfigVersion(
            config_version.to_string(),
        ));
    }

    let id = child_text(root, "id").ok_or(DescriptorError::MissingField("id"))?;
    let descriptor = ModuleDescriptor {
        name: child_text(root, "name").unwrap_or_default(),
        author: child_text(root, "author").unwrap_or_default(),
        description: child_text(root, "description").unwrap_or_default(),
        version: child_text(root, "version").unwrap_or_default(),
        config_version: config_version.to_string(),
        package_name: child_text(root, "package"),
        activator: child_text(root, "activator"),
        require_platform_version: child_text(root, "require_version"),
        required_modules: parse_module_list(root, "require_modules", "require_module"),
        aware_of_modules: parse_module_list(root, "aware_of_modules", "aware_of_module"),
        conditional_resources: parse_conditional_resources(root)?,
        advice_points: parse_advice(root, &Weak::new()),
        privileges: parse_privileges(root),
        extensions: parse_extensions(root),
        global_properties: parse_global_properties(root),
        id,
    };

    info!(
        "event=descriptor_parse module=parser status=ok module_id={} config_version={} conditional_resources={} advice={} privileges={} extensions={}",
        descriptor.id,
        descriptor.config_version,
        descriptor.conditional_resources.len(),
        descriptor.advice_points.len(),
        descriptor.privileges.len(),
        descriptor.extensions.len()
    );
    Ok(descriptor)
}
