//! Strict parsing of `<conditionalResources>`.
//!
//! Conditional resources decide which packaged files get loaded, so every
//! structural problem here is fatal for the whole descriptor.

use super::error::{DescriptorError, DescriptorResult};
use super::xml::{child_elements, child_text, element_text, non_blank, tag_name};
use crate::model::descriptor::{ConditionalResource, RequiredModule};
use roxmltree::Node;

const CONTAINER_TAG: &str = "conditionalResources";
const ENTRY_TAG: &str = "conditionalResource";
const PATH_TAG: &str = "path";
const OPENMRS_VERSION_TAG: &str = "openmrsVersion";
const PLATFORM_VERSION_TAG: &str = "platformVersion";
const MODULES_TAG: &str = "modules";
const MODULE_TAG: &str = "module";
const MODULE_ID_TAG: &str = "moduleId";
const VERSION_TAG: &str = "version";

/// Parses the conditional resources declared directly under `root`.
///
/// Returns an empty list when no container is present.
///
/// # Errors
/// - More than one `<conditionalResources>` container.
/// - A container child other than `<conditionalResource>`.
/// - An entry with an unknown child tag or a blank `<path>`.
/// - A required module missing `<moduleId>` or `<version>`.
pub fn parse_conditional_resources(root: Node<'_, '_>) -> DescriptorResult<Vec<ConditionalResource>> {
    let containers: Vec<Node<'_, '_>> = child_elements(root)
        .filter(|child| tag_name(*child) == CONTAINER_TAG)
        .collect();
    let container = match containers.as_slice() {
        [] => return Ok(Vec::new()),
        [container] => *container,
        many => return Err(DescriptorError::MultipleConditionalResources(many.len())),
    };

    child_elements(container)
        .map(|entry| {
            if tag_name(entry) != ENTRY_TAG {
                return Err(DescriptorError::UnexpectedConditionalResourceTag(
                    tag_name(entry).to_string(),
                ));
            }
            parse_entry(entry)
        })
        .collect()
}

fn parse_entry(entry: Node<'_, '_>) -> DescriptorResult<ConditionalResource> {
    let mut path = None;
    let mut min_platform_version = None;
    let mut required_modules = Vec::new();

    for child in child_elements(entry) {
        match tag_name(child) {
            PATH_TAG => path = non_blank(element_text(child)),
            OPENMRS_VERSION_TAG | PLATFORM_VERSION_TAG => {
                min_platform_version = non_blank(element_text(child));
            }
            MODULES_TAG => required_modules = parse_required_modules(child)?,
            other => {
                return Err(DescriptorError::UnexpectedConditionalResourceChild(
                    other.to_string(),
                ))
            }
        }
    }

    Ok(ConditionalResource {
        path: path.ok_or(DescriptorError::BlankConditionalResourcePath)?,
        min_platform_version,
        required_modules,
    })
}

fn parse_required_modules(modules: Node<'_, '_>) -> DescriptorResult<Vec<RequiredModule>> {
    child_elements(modules)
        .map(|module| {
            if tag_name(module) != MODULE_TAG {
                return Err(DescriptorError::UnexpectedModulesChild(
                    tag_name(module).to_string(),
                ));
            }
            let module_id = child_text(module, MODULE_ID_TAG)
                .ok_or(DescriptorError::IncompleteModuleRequirement(MODULE_ID_TAG))?;
            let version = child_text(module, VERSION_TAG)
                .ok_or(DescriptorError::IncompleteModuleRequirement(VERSION_TAG))?;
            Ok(RequiredModule { module_id, version })
        })
        .collect()
}
