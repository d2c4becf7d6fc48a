//! Node snapshots: the self-contained descriptors that travel in mutation
//! records instead of live references.

use crate::attributes;
use crate::event::EventNode;
use crate::path;
use crate::record::NodeDescriptor;
use crate::stylesheets;
use dom::{Node, find_node_by_id};

/// Snapshot an event's node reference against the source tree.
///
/// `None` when the reference is a live id that no longer resolves —
/// events may carry dead sibling references, and callers treat those the
/// same as an absent sibling. Detached nodes snapshot with an empty path.
pub fn snapshot(
    source: &Node,
    node: &EventNode,
    include_inner_markup: bool,
) -> Option<NodeDescriptor> {
    match node {
        EventNode::Live(id) => {
            let live = find_node_by_id(source, *id)?;
            let path = path::path_of(source, *id).unwrap_or_default();
            Some(snapshot_node(live, path, include_inner_markup))
        }
        EventNode::Detached(detached) => {
            Some(snapshot_node(detached, String::new(), include_inner_markup))
        }
    }
}

/// Snapshot a node with a precomputed path.
///
/// `include_inner_markup` captures the serialized subtree so an inserted
/// node can be materialized in one step — descendants of an added node are
/// never reported as separate additions.
pub fn snapshot_node(node: &Node, path: String, include_inner_markup: bool) -> NodeDescriptor {
    match node {
        Node::Element { name, .. } => NodeDescriptor::Element {
            name: name.clone(),
            path,
            attributes: attributes::extract(node),
            inner_markup: include_inner_markup.then(|| dom::serialize_children(node)),
            style_rules: stylesheets::extract(node),
        },
        Node::Text { text, .. } => NodeDescriptor::Text {
            path,
            value: text.clone(),
        },
        Node::Comment { text, .. } => NodeDescriptor::Comment {
            path,
            value: text.clone(),
        },
        Node::Document { .. } => NodeDescriptor::Document { path },
    }
}
