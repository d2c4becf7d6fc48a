//! Observed change events, as handed over by whatever watches the source
//! tree.
//!
//! A reference into the source tree is an id; a node that left the tree
//! is handed over as the detached subtree itself, since nothing in the
//! source can address it anymore. The subscription mechanism producing
//! these is out of scope — events arrive already observed, in temporal
//! order.

use dom::{Id, Node};

/// A node reference inside a change event.
#[derive(Clone, Debug)]
pub enum EventNode {
    /// A node currently attached to the source tree.
    Live(Id),
    /// A node no longer in the source tree, handed over whole.
    Detached(Node),
}

impl From<Id> for EventNode {
    fn from(id: Id) -> Self {
        EventNode::Live(id)
    }
}

/// One observed atomic change to the source tree.
#[derive(Clone, Debug)]
pub enum ChangeEvent {
    /// An attribute was set or removed on `target`.
    Attributes {
        target: EventNode,
        attribute_name: String,
        attribute_namespace: Option<String>,
    },
    /// `target`'s text payload was replaced.
    CharacterData { target: EventNode },
    /// Children were added to and/or removed from `target`.
    ChildList {
        target: EventNode,
        added: Vec<EventNode>,
        removed: Vec<EventNode>,
        previous_sibling: Option<EventNode>,
        next_sibling: Option<EventNode>,
    },
}
