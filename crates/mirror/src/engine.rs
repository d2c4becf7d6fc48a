//! Mutation replay.
//!
//! The engine owns the replica tree and the tracked stylesheet list, and
//! consumes mutation records strictly in production order: path
//! resolution for record k assumes the replica already reflects records
//! 1..k-1. Within a record, sibling anchors are resolved once and then
//! tracked through this record's own removals and insertions, which is
//! what live sibling references gave the producing observer for free.
//!
//! Replay is best-effort: a target that fails to resolve skips that
//! sub-step and the batch keeps going. Only protocol-level defects
//! (missing fields, unsupported node kinds) abort a batch, and nothing
//! already applied is undone.

use crate::attributes;
use crate::error::MirrorError;
use crate::path::{self, Segment};
use crate::record::{AttributeMap, MutationRecord, NodeDescriptor, StyleSheetDescriptor};
use dom::{Id, Namespace, Node};

pub struct DomMirror {
    replica: Node,
    sheets: Vec<StyleSheetDescriptor>,
}

impl DomMirror {
    /// Build a mirror around a replica parsed from markup, optionally
    /// seeded with already-tracked stylesheets.
    ///
    /// Fails when the markup cannot be parsed into a tree.
    pub fn new(
        initial_markup: &str,
        initial_style_sheets: Option<Vec<StyleSheetDescriptor>>,
    ) -> Result<Self, MirrorError> {
        Ok(Self {
            replica: dom::parse_document(initial_markup)?,
            sheets: initial_style_sheets.unwrap_or_default(),
        })
    }

    /// Serialized markup of the replica.
    pub fn dom(&self) -> String {
        dom::serialize(&self.replica)
    }

    /// Reparse and replace the replica. Tracked stylesheets are kept
    /// as-is; callers wanting a clean slate reset them explicitly.
    pub fn set_dom(&mut self, markup: &str) -> Result<(), MirrorError> {
        self.replica = dom::parse_document(markup)?;
        Ok(())
    }

    pub fn style_sheets(&self) -> &[StyleSheetDescriptor] {
        &self.sheets
    }

    pub fn set_style_sheets(&mut self, sheets: Vec<StyleSheetDescriptor>) {
        self.sheets = sheets;
    }

    /// The replica itself, for inspection between batches.
    pub fn document(&self) -> &Node {
        &self.replica
    }

    /// Tear the mirror down, handing the replica back to the caller.
    pub fn into_document(self) -> Node {
        self.replica
    }

    /// Apply records in array order, one at a time.
    pub fn apply_mutations(&mut self, records: &[MutationRecord]) -> Result<(), MirrorError> {
        for record in records {
            match record {
                MutationRecord::Attributes {
                    target,
                    attribute_name,
                    ..
                } => self.apply_attributes(target.as_ref(), attribute_name.as_deref())?,
                MutationRecord::CharacterData { target, .. } => {
                    self.apply_character_data(target.as_ref())?
                }
                MutationRecord::ChildList {
                    target,
                    previous_sibling,
                    next_sibling,
                    added_nodes,
                    removed_nodes,
                } => self.apply_child_list(
                    target.as_ref(),
                    previous_sibling.as_ref(),
                    next_sibling.as_ref(),
                    added_nodes,
                    removed_nodes,
                )?,
            }
        }
        Ok(())
    }

    fn apply_attributes(
        &mut self,
        target: Option<&NodeDescriptor>,
        attribute_name: Option<&str>,
    ) -> Result<(), MirrorError> {
        let target = require_target(target)?;
        let Some(route) = self.resolve(target.path()) else {
            log::debug!(target: "mirror.apply", "skipping attributes record, stale target {}", target.path());
            return Ok(());
        };
        let attributes = target
            .attributes()
            .ok_or(MirrorError::MissingField("target.attributes"))?;
        let name = attribute_name.ok_or(MirrorError::MissingField("attributeName"))?;
        if let Some(node) = node_at_mut(&mut self.replica, &route) {
            attributes::apply_one(node, name, attributes);
        }
        Ok(())
    }

    fn apply_character_data(&mut self, target: Option<&NodeDescriptor>) -> Result<(), MirrorError> {
        let target = require_target(target)?;
        let has_parent_segment = path::parse(target.path()).is_some_and(|s| s.len() >= 2);
        if !has_parent_segment {
            return Err(MirrorError::MissingField("target parent path"));
        }
        let Some(route) = self.resolve(target.path()) else {
            log::debug!(target: "mirror.apply", "skipping characterData record, stale target {}", target.path());
            return Ok(());
        };
        if let Some(node) = node_at_mut(&mut self.replica, &route) {
            node.set_text(target.value().unwrap_or_default());
        }
        Ok(())
    }

    fn apply_child_list(
        &mut self,
        target: Option<&NodeDescriptor>,
        previous_sibling: Option<&NodeDescriptor>,
        next_sibling: Option<&NodeDescriptor>,
        added_nodes: &[NodeDescriptor],
        removed_nodes: &[NodeDescriptor],
    ) -> Result<(), MirrorError> {
        let target = require_target(target)?;
        let Some(mut target_route) = self.resolve(target.path()) else {
            log::debug!(target: "mirror.apply", "skipping childList record, stale target {}", target.path());
            return Ok(());
        };
        if node_at(&self.replica, &target_route).is_none_or(|n| n.children().is_none()) {
            return Ok(());
        }

        let mut prev_idx = self.anchor_index(&target_route, previous_sibling);
        let mut next_idx = self.anchor_index(&target_route, next_sibling);

        for removed in removed_nodes {
            if let Some(rules) = removed.style_rules()
                && let Some(pos) = self.sheets.iter().position(|s| s == rules)
            {
                self.sheets.remove(pos);
            }

            // The removed node's own path may still be good: later records
            // in the producing batch can leave the replica holding it at a
            // stable location. Prefer that over positional guessing.
            let own_route = (!removed.path().is_empty())
                .then(|| self.resolve(removed.path()))
                .flatten();
            if let Some(route) = own_route {
                if remove_at(&mut self.replica, &route).is_some() {
                    if !note_removal(&mut target_route, &mut prev_idx, &mut next_idx, &route) {
                        // The target went with the removed subtree; the
                        // rest of this record has nothing left to mutate.
                        return Ok(());
                    }
                    continue;
                }
            }

            // Positional fallback: the path went stale (the node left the
            // source tree before serialization ran), so lean on the anchors.
            // A next-sibling anchor at position 0 has nothing before it —
            // its path was computed after the removal, so the first child
            // is the removal candidate.
            let index = if let Some(p) = prev_idx {
                p + 1
            } else if let Some(n) = next_idx
                && n > 0
            {
                n - 1
            } else {
                0
            };
            let Some(children) = node_at_mut(&mut self.replica, &target_route)
                .and_then(|n| n.children_mut())
            else {
                continue;
            };
            if index >= children.len() {
                log::debug!(target: "mirror.apply", "no removal candidate under {}", target.path());
                continue;
            }
            children.remove(index);
            adjust_anchor_after_removal(&mut prev_idx, index);
            adjust_anchor_after_removal(&mut next_idx, index);
        }

        for added in added_nodes {
            // A node may already sit at the added path: either the replica
            // genuinely has it (re-sent insert) or it is an auto-created
            // root the new node would duplicate. Look it up before the
            // insertion shifts any ordinals.
            let existing_route = (!added.path().is_empty())
                .then(|| self.resolve(added.path()))
                .flatten();

            let new_node = materialize(added)?;

            if let Some(rules) = added.style_rules() {
                self.sheets.push(rules.clone());
            }

            let is_duplicate = existing_route
                .as_ref()
                .and_then(|r| node_at(&self.replica, r))
                .is_some_and(|existing| {
                    existing.content_eq(&new_node)
                        || added.name().eq_ignore_ascii_case("body")
                });

            let Some(children) = node_at(&self.replica, &target_route).and_then(Node::children)
            else {
                continue;
            };
            let index = if let Some(p) = prev_idx {
                (p + 1).min(children.len())
            } else if let Some(n) = next_idx {
                n.min(children.len())
            } else if let Some(ordinal) = path::trailing_ordinal(added.path()) {
                nth_same_kind_index(children, &new_node, ordinal).unwrap_or(children.len())
            } else {
                children.len()
            };

            let Some(children) = node_at_mut(&mut self.replica, &target_route)
                .and_then(|n| n.children_mut())
            else {
                continue;
            };
            children.insert(index, new_node);
            adjust_anchor_after_insert(&mut prev_idx, index);
            adjust_anchor_after_insert(&mut next_idx, index);

            let mut inserted_route = target_route.clone();
            inserted_route.push(index);

            if is_duplicate && let Some(route) = existing_route {
                let route = route_after_insertion(&route, &inserted_route);
                if remove_at(&mut self.replica, &route).is_some()
                    && !note_removal(&mut target_route, &mut prev_idx, &mut next_idx, &route)
                {
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    /// Evaluate a path against the replica as a child-index route.
    fn resolve(&self, path: &str) -> Option<Vec<usize>> {
        let segments = path::parse(path)?;
        let mut route = Vec::with_capacity(segments.len());
        let mut current = &self.replica;
        for segment in segments {
            let children = current.children()?;
            let index = match segment {
                Segment::Text => children.iter().position(Node::is_text)?,
                Segment::Comment => children.iter().position(Node::is_comment)?,
                Segment::Element { name, ordinal } => {
                    let wanted = ordinal.unwrap_or(1);
                    let mut seen = 0usize;
                    children.iter().position(|c| {
                        c.element_name()
                            .is_some_and(|n| n.eq_ignore_ascii_case(name))
                            && {
                                seen += 1;
                                seen == wanted
                            }
                    })?
                }
            };
            current = &children[index];
            route.push(index);
        }
        Some(route)
    }

    /// Resolve a sibling anchor to its child position under the target
    /// parent. Anchors that resolve elsewhere count as unresolved.
    fn anchor_index(
        &self,
        target_route: &[usize],
        sibling: Option<&NodeDescriptor>,
    ) -> Option<usize> {
        let descriptor = sibling?;
        if descriptor.path().is_empty() {
            return None;
        }
        let route = self.resolve(descriptor.path())?;
        let (&last, parent) = route.split_last()?;
        (parent == target_route).then_some(last)
    }
}

fn require_target(target: Option<&NodeDescriptor>) -> Result<&NodeDescriptor, MirrorError> {
    let target = target.ok_or(MirrorError::MissingField("target"))?;
    if target.path().is_empty() {
        return Err(MirrorError::MissingField("target.path"));
    }
    Ok(target)
}

/// Build a replica node from an added-node descriptor: attributes applied,
/// inner markup parsed as the subtree, graphics tags in their own
/// namespace. Unsupported kinds are a protocol error.
fn materialize(descriptor: &NodeDescriptor) -> Result<Node, MirrorError> {
    match descriptor {
        NodeDescriptor::Element {
            name,
            attributes,
            inner_markup,
            ..
        } => {
            let tag = name.to_ascii_lowercase();
            let mut node = Node::Element {
                id: Id::UNSET,
                namespace: Namespace::for_tag(&tag),
                name: tag,
                attributes: Vec::new(),
                sheet: None,
                children: dom::parse_fragment(inner_markup.as_deref().unwrap_or_default()),
            };
            apply_attribute_map(&mut node, attributes);
            Ok(node)
        }
        NodeDescriptor::Text { value, .. } => Ok(Node::Text {
            id: Id::UNSET,
            text: value.clone(),
        }),
        NodeDescriptor::Comment { value, .. } => Ok(Node::Comment {
            id: Id::UNSET,
            text: value.clone(),
        }),
        other => Err(MirrorError::UnsupportedNodeKind {
            path: other.path().to_string(),
        }),
    }
}

fn apply_attribute_map(node: &mut Node, attributes: &AttributeMap) {
    for (name, value) in attributes {
        node.set_attribute(name, value);
    }
}

/// Index of the `ordinal`-th (1-based) child that shares `node`'s kind —
/// same element name for elements, same text/comment variant otherwise.
/// `None` when fewer than `ordinal` same-kind siblings exist, matching the
/// ordinal semantics used by [`DomMirror::resolve`].
fn nth_same_kind_index(children: &[Node], node: &Node, ordinal: usize) -> Option<usize> {
    let same_kind = |other: &Node| match node {
        Node::Element { name, .. } => other
            .element_name()
            .is_some_and(|n| n.eq_ignore_ascii_case(name)),
        Node::Text { .. } => other.is_text(),
        Node::Comment { .. } => other.is_comment(),
        Node::Document { .. } => other.is_document(),
    };
    let mut seen = 0usize;
    children.iter().position(|c| {
        same_kind(c) && {
            seen += 1;
            seen == ordinal
        }
    })
}

fn node_at<'a>(root: &'a Node, route: &[usize]) -> Option<&'a Node> {
    let mut current = root;
    for &index in route {
        current = current.children()?.get(index)?;
    }
    Some(current)
}

fn node_at_mut<'a>(root: &'a mut Node, route: &[usize]) -> Option<&'a mut Node> {
    let mut current = root;
    for &index in route {
        current = current.children_mut()?.get_mut(index)?;
    }
    Some(current)
}

fn remove_at(root: &mut Node, route: &[usize]) -> Option<Node> {
    let (&last, parent_route) = route.split_last()?;
    let children = node_at_mut(root, parent_route)?.children_mut()?;
    (last < children.len()).then(|| children.remove(last))
}

/// Rewrite `route` for the removal of the node at `removed`. `None` when
/// `route` pointed into the removed subtree.
fn route_after_removal(route: &[usize], removed: &[usize]) -> Option<Vec<usize>> {
    if route.starts_with(removed) {
        return None;
    }
    let mut out = route.to_vec();
    let depth = removed.len() - 1;
    if route.len() > depth && route[..depth] == removed[..depth] && route[depth] > removed[depth] {
        out[depth] -= 1;
    }
    Some(out)
}

/// Rewrite `route` for an insertion at `inserted`.
fn route_after_insertion(route: &[usize], inserted: &[usize]) -> Vec<usize> {
    let mut out = route.to_vec();
    let depth = inserted.len() - 1;
    if route.len() > depth && route[..depth] == inserted[..depth] && route[depth] >= inserted[depth]
    {
        out[depth] += 1;
    }
    out
}

/// Track a removal through this record's bookkeeping. Returns `false`
/// when the target itself was inside the removed subtree.
fn note_removal(
    target_route: &mut Vec<usize>,
    prev_idx: &mut Option<usize>,
    next_idx: &mut Option<usize>,
    removed: &[usize],
) -> bool {
    let Some(new_route) = route_after_removal(target_route, removed) else {
        return false;
    };
    if removed.len() == new_route.len() + 1 && removed[..new_route.len()] == new_route[..] {
        let index = removed[new_route.len()];
        adjust_anchor_after_removal(prev_idx, index);
        adjust_anchor_after_removal(next_idx, index);
    }
    *target_route = new_route;
    true
}

fn adjust_anchor_after_removal(anchor: &mut Option<usize>, removed_index: usize) {
    if let Some(a) = *anchor {
        if removed_index == a {
            // The anchor node itself is gone; stop using it.
            *anchor = None;
        } else if removed_index < a {
            *anchor = Some(a - 1);
        }
    }
}

fn adjust_anchor_after_insert(anchor: &mut Option<usize>, inserted_index: usize) {
    if let Some(a) = *anchor
        && inserted_index <= a
    {
        *anchor = Some(a + 1);
    }
}
