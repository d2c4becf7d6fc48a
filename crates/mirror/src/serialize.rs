//! Change events → portable mutation records.
//!
//! A pure, order-preserving map: one record per event, in event order,
//! with every node reference replaced by a snapshot. No replay state is
//! touched here — this is the only boundary that reads live source-tree
//! references, and nothing of them survives into the output.

use crate::event::{ChangeEvent, EventNode};
use crate::record::MutationRecord;
use crate::snapshot::snapshot;
use dom::Node;

pub fn serialize_mutations(source: &Node, events: &[ChangeEvent]) -> Vec<MutationRecord> {
    events
        .iter()
        .map(|event| serialize_event(source, event))
        .collect()
}

fn serialize_event(source: &Node, event: &ChangeEvent) -> MutationRecord {
    match event {
        ChangeEvent::Attributes {
            target,
            attribute_name,
            attribute_namespace,
        } => MutationRecord::Attributes {
            target: snapshot(source, target, false),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some(attribute_name.clone()),
            attribute_namespace: attribute_namespace.clone(),
        },
        ChangeEvent::CharacterData { target } => MutationRecord::CharacterData {
            target: snapshot(source, target, false),
            previous_sibling: None,
            next_sibling: None,
        },
        ChangeEvent::ChildList {
            target,
            added,
            removed,
            previous_sibling,
            next_sibling,
        } => MutationRecord::ChildList {
            target: snapshot(source, target, false),
            previous_sibling: snapshot_sibling(source, previous_sibling),
            next_sibling: snapshot_sibling(source, next_sibling),
            // Added nodes carry their serialized subtree so the replay side
            // can materialize them in one step; a dead added reference has
            // nothing to materialize from and is dropped here.
            added_nodes: added
                .iter()
                .filter_map(|n| snapshot(source, n, true))
                .collect(),
            removed_nodes: removed
                .iter()
                .filter_map(|n| snapshot(source, n, false))
                .collect(),
        },
    }
}

fn snapshot_sibling(source: &Node, sibling: &Option<EventNode>) -> Option<crate::record::NodeDescriptor> {
    sibling.as_ref().and_then(|n| snapshot(source, n, false))
}
