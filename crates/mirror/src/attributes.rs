//! Attribute extraction and single-attribute application.

use crate::record::AttributeMap;
use dom::Node;

/// Every attribute of a node as an ordered name→value mapping, in document
/// order. Valueless attributes map to the empty string. Empty for
/// non-element nodes.
pub fn extract(node: &Node) -> AttributeMap {
    node.attributes()
        .map(|attrs| {
            attrs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone().unwrap_or_default()))
                .collect()
        })
        .unwrap_or_default()
}

/// Apply exactly one named attribute from a mapping: set it to the mapped
/// value when present, remove it when absent.
///
/// Never diffs the full mapping — attribute changes are reported one
/// attribute at a time, and the mapping is the target's full state at
/// observation time.
pub fn apply_one(node: &mut Node, name: &str, attributes: &AttributeMap) {
    match lookup(attributes, name) {
        Some(value) => node.set_attribute(name, value),
        None => node.remove_attribute(name),
    }
}

fn lookup<'a>(attributes: &'a AttributeMap, name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
