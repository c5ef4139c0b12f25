//! Small helpers over `roxmltree` nodes.
//!
//! Only element nodes are ever inspected; whitespace, stray text and
//! comments between tags are skipped.

use roxmltree::Node;

pub(crate) fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

pub(crate) fn descendants_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .filter(move |child| child.is_element() && tag_name(*child) == tag)
}

pub(crate) fn tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Concatenated, trimmed text content of `node`.
pub(crate) fn element_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|text| text.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Trimmed text of the first direct child named `tag`; blank counts as absent.
pub(crate) fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_elements(node)
        .find(|child| tag_name(*child) == tag)
        .map(element_text)
        .and_then(non_blank)
}

pub(crate) fn non_blank(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
