//! Keep a disconnected replica tree convergent with a live source tree by
//! serializing observed change events into portable, order-dependent
//! records and replaying them.
//!
//! The flow is one-directional: change events observed on a source tree
//! go through [`serialize_mutations`] into [`MutationRecord`]s — plain
//! JSON-serializable data with no live references — and a [`DomMirror`]
//! replays them against its own replica, tracking the side-channel of
//! style rules that markup text alone cannot recover.
//!
//! ```
//! use mirror::{ChangeEvent, DomMirror, EventNode, serialize_mutations};
//!
//! let source = dom::parse_document("<p>Hi</p>").unwrap();
//! let p = source.children().unwrap()[0].id();
//!
//! let mut replica = DomMirror::new("<p>Hi</p>", None).unwrap();
//! // Pretend the observer saw `class` change on <p> after the source
//! // already holds the new value.
//! let mut source = source;
//! source.children_mut().unwrap()[0].set_attribute("class", "hot");
//! let records = serialize_mutations(
//!     &source,
//!     &[ChangeEvent::Attributes {
//!         target: EventNode::Live(p),
//!         attribute_name: "class".to_string(),
//!         attribute_namespace: None,
//!     }],
//! );
//! replica.apply_mutations(&records).unwrap();
//! assert_eq!(replica.dom(), r#"<p class="hot">Hi</p>"#);
//! ```

pub mod attributes;
pub mod path;
pub mod snapshot;
pub mod stylesheets;

mod engine;
mod error;
mod event;
mod record;
mod serialize;

pub use crate::engine::DomMirror;
pub use crate::error::MirrorError;
pub use crate::event::{ChangeEvent, EventNode};
pub use crate::record::{
    AttributeMap, MutationRecord, NodeDescriptor, StyleRule, StyleSheetDescriptor,
};
pub use crate::serialize::serialize_mutations;
pub use crate::stylesheets::serialize_style_sheets;
