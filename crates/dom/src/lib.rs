//! Minimal owned-tree markup engine: parse markup text into a node tree,
//! serialize a tree back to markup, and mutate trees in place.
//!
//! This is deliberately not a spec-complete HTML5 engine. The tokenizer
//! documents its constraints; the builder is tolerant of unbalanced input;
//! the serializer emits normalized markup whose reparse is stable.

mod builder;
mod entities;
mod serialize;
mod tokenizer;
mod types;

pub use crate::builder::{ParseError, build_document, parse_document, parse_fragment};
pub use crate::serialize::{serialize, serialize_children};
pub use crate::tokenizer::{Token, tokenize};
pub use crate::types::{
    Id, Namespace, Node, NodeId, StyleSheet, assign_node_ids, find_node_by_id,
};
