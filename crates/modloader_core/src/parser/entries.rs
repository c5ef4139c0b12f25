//! Lenient parsing of additive descriptor entries.
//!
//! Advice points, privileges, extensions and global properties tolerate
//! partial data: an entry missing a required field is dropped and the rest
//! of the descriptor still loads.

use super::xml::{child_elements, child_text, descendants_named, element_text, tag_name};
use crate::model::descriptor::{
    AdvicePoint, ExtensionDeclaration, GlobalPropertyDeclaration, PrivilegeDeclaration,
    RequiredModule,
};
use crate::model::module::Module;
use log::debug;
use roxmltree::Node;
use std::sync::Weak;

const ADVICE_TAG: &str = "advice";
const PRIVILEGE_TAG: &str = "privilege";
const EXTENSION_TAG: &str = "extension";
const GLOBAL_PROPERTY_TAG: &str = "globalProperty";
const POINT_TAG: &str = "point";
const CLASS_TAG: &str = "class";
const NAME_TAG: &str = "name";
const DESCRIPTION_TAG: &str = "description";
const PROPERTY_TAG: &str = "property";
const DEFAULT_VALUE_TAG: &str = "defaultValue";
const VERSION_ATTR: &str = "version";

/// Collects `<advice>` entries with both `<point>` and `<class>`.
pub fn parse_advice(root: Node<'_, '_>, owner: &Weak<Module>) -> Vec<AdvicePoint> {
    descendants_named(root, ADVICE_TAG)
        .filter_map(|node| {
            let point = child_text(node, POINT_TAG);
            let class_name = child_text(node, CLASS_TAG);
            match (point, class_name) {
                (Some(point), Some(class_name)) => {
                    Some(AdvicePoint::new(point, class_name, owner.clone()))
                }
                _ => dropped(ADVICE_TAG),
            }
        })
        .collect()
}

/// Collects `<privilege>` entries with both `<name>` and `<description>`.
pub fn parse_privileges(root: Node<'_, '_>) -> Vec<PrivilegeDeclaration> {
    descendants_named(root, PRIVILEGE_TAG)
        .filter_map(|node| {
            match (child_text(node, NAME_TAG), child_text(node, DESCRIPTION_TAG)) {
                (Some(name), Some(description)) => Some(PrivilegeDeclaration { name, description }),
                _ => dropped(PRIVILEGE_TAG),
            }
        })
        .collect()
}

/// Collects `<extension>` entries with both `<point>` and `<class>`.
pub fn parse_extensions(root: Node<'_, '_>) -> Vec<ExtensionDeclaration> {
    descendants_named(root, EXTENSION_TAG)
        .filter_map(|node| {
            match (child_text(node, POINT_TAG), child_text(node, CLASS_TAG)) {
                (Some(point), Some(class_name)) => Some(ExtensionDeclaration { point, class_name }),
                _ => dropped(EXTENSION_TAG),
            }
        })
        .collect()
}

/// Collects `<globalProperty>` entries that name a `<property>`.
pub fn parse_global_properties(root: Node<'_, '_>) -> Vec<GlobalPropertyDeclaration> {
    descendants_named(root, GLOBAL_PROPERTY_TAG)
        .filter_map(|node| {
            let Some(property) = child_text(node, PROPERTY_TAG) else {
                return dropped(GLOBAL_PROPERTY_TAG);
            };
            Some(GlobalPropertyDeclaration {
                property,
                default_value: child_text(node, DEFAULT_VALUE_TAG),
                description: child_text(node, DESCRIPTION_TAG),
            })
        })
        .collect()
}

/// Collects `<container><entry version="x">id</entry></container>` lists
/// such as `require_modules` and `aware_of_modules`.
///
/// Entries with a blank id are dropped; a missing version attribute becomes
/// an empty (always satisfied) constraint.
pub fn parse_module_list(
    root: Node<'_, '_>,
    container: &'static str,
    entry: &'static str,
) -> Vec<RequiredModule> {
    child_elements(root)
        .filter(|node| tag_name(*node) == container)
        .flat_map(child_elements)
        .filter(|node| tag_name(*node) == entry)
        .filter_map(|node| {
            let module_id = element_text(node);
            if module_id.is_empty() {
                return dropped(entry);
            }
            let version = node.attribute(VERSION_ATTR).unwrap_or_default().trim();
            Some(RequiredModule::new(module_id, version))
        })
        .collect()
}

fn dropped<T>(tag: &str) -> Option<T> {
    debug!("event=descriptor_parse module=parser status=skip tag={tag} reason=missing_field");
    None
}
