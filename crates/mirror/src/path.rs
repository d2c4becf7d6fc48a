//! Positional path addressing.
//!
//! A path locates a node inside a structurally equivalent tree without a
//! live reference: segments from root to node joined by `/`, elements by
//! tag name with a 1-based ordinal `[n]` only when a same-name sibling
//! exists on either side, text and comment nodes by functional marker.
//! Paths are order-sensitive and never cached — insertions and removals
//! shift the ordinals, so a path is only valid against the tree state it
//! was computed from.

use dom::{Id, Node};

pub const TEXT_SEGMENT: &str = "text()";
pub const COMMENT_SEGMENT: &str = "comment()";

/// Compute the absolute path of the node with the given id.
///
/// Returns `None` when the id does not occur under `root`, and an empty
/// path when the node cannot be the target of a mutation (the document
/// itself). Empty paths mean "unaddressable", not an error.
pub fn path_of(root: &Node, id: Id) -> Option<String> {
    if root.id() == id {
        return Some(String::new());
    }
    let mut segments = Vec::new();
    if locate(root, id, &mut segments) {
        Some(format!("/{}", segments.join("/")))
    } else {
        None
    }
}

fn locate(parent: &Node, id: Id, segments: &mut Vec<String>) -> bool {
    let Some(children) = parent.children() else {
        return false;
    };
    for (index, child) in children.iter().enumerate() {
        if child.id() == id {
            segments.push(segment_for(children, index));
            return true;
        }
        segments.push(segment_for(children, index));
        if locate(child, id, segments) {
            return true;
        }
        segments.pop();
    }
    false
}

/// Path segment for `children[index]` among its siblings.
///
/// The document-type declaration is a document field rather than a
/// sibling node, so it can never take part in ordinal counting.
fn segment_for(children: &[Node], index: usize) -> String {
    let node = &children[index];
    match node {
        Node::Text { .. } => TEXT_SEGMENT.to_string(),
        Node::Comment { .. } => COMMENT_SEGMENT.to_string(),
        _ => {
            let name = node.element_name().unwrap_or_default();
            let earlier = children[..index]
                .iter()
                .filter(|s| same_name(s, name))
                .count();
            let later = children[index + 1..].iter().any(|s| same_name(s, name));
            if earlier > 0 || later {
                format!("{name}[{}]", earlier + 1)
            } else {
                name.to_string()
            }
        }
    }
}

fn same_name(node: &Node, name: &str) -> bool {
    node.element_name()
        .is_some_and(|n| n.eq_ignore_ascii_case(name))
}

/// One parsed path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Element {
        name: &'a str,
        /// 1-based position among same-name siblings; `None` means unique.
        ordinal: Option<usize>,
    },
    Text,
    Comment,
}

/// Parse an absolute path into segments. `None` for empty or malformed
/// paths — callers treat that the same as a path that fails to resolve.
pub(crate) fn parse(path: &str) -> Option<Vec<Segment<'_>>> {
    let rest = path.strip_prefix('/')?;
    let mut segments = Vec::new();
    for part in rest.split('/') {
        if part.is_empty() {
            return None;
        }
        segments.push(match part {
            TEXT_SEGMENT => Segment::Text,
            COMMENT_SEGMENT => Segment::Comment,
            _ => match split_ordinal(part) {
                Some((name, ordinal)) => Segment::Element {
                    name,
                    ordinal: Some(ordinal),
                },
                None => Segment::Element {
                    name: part,
                    ordinal: None,
                },
            },
        });
    }
    Some(segments)
}

/// The trailing 1-based ordinal of a path, if its last segment has one.
pub(crate) fn trailing_ordinal(path: &str) -> Option<usize> {
    let last = path.rsplit('/').next()?;
    split_ordinal(last).map(|(_, n)| n)
}

fn split_ordinal(segment: &str) -> Option<(&str, usize)> {
    let inner = segment.strip_suffix(']')?;
    let open = inner.rfind('[')?;
    let n: usize = inner[open + 1..].parse().ok()?;
    (n > 0).then(|| (&inner[..open], n))
}
