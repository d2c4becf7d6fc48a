//! Stylesheet extraction.
//!
//! A style-bearing node's effective rules may have been inserted
//! programmatically and are then absent from its serialized markup, so
//! they travel as an explicit descriptor alongside the node snapshot.
//! The replay side only maintains its tracked side-list from these — it
//! never re-inserts rules into the replica's own style handling.

use crate::record::StyleSheetDescriptor;
use dom::{Node, StyleSheet};

/// The ordered rule list currently attached to a node, or `None` when the
/// node bears no rules.
pub fn extract(node: &Node) -> Option<StyleSheetDescriptor> {
    let sheet = node.sheet()?;
    if sheet.is_empty() {
        return None;
    }
    Some(convert(sheet))
}

/// Bulk conversion of a tree engine sheet list, used to seed an engine's
/// initial tracked sheets.
pub fn serialize_style_sheets(sheets: &[StyleSheet]) -> Vec<StyleSheetDescriptor> {
    sheets.iter().map(convert).collect()
}

fn convert(sheet: &StyleSheet) -> StyleSheetDescriptor {
    StyleSheetDescriptor::from_rule_texts(sheet.rules.iter().cloned())
}
