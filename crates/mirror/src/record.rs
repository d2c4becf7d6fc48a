//! Portable wire types.
//!
//! Everything here is plain data: strings, arrays, nested objects. The
//! serde form is a camelCase tagged representation, so a record travels
//! as `{"type":"childList","target":{"kind":"element",...},...}` and can
//! be produced or consumed by non-Rust peers.

use serde::{Deserialize, Serialize};

/// Ordered attribute mapping in document order.
pub type AttributeMap = Vec<(String, String)>;

pub const TEXT_NODE_NAME: &str = "#text";
pub const COMMENT_NODE_NAME: &str = "#comment";
pub const DOCUMENT_NODE_NAME: &str = "#document";
pub const FRAGMENT_NODE_NAME: &str = "#document-fragment";

/// One style rule, by its rule text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    #[serde(rename = "ruleText")]
    pub rule_text: String,
}

/// Ordered rule list of one tracked stylesheet.
///
/// Carries no stable identity: two sheets with equal rule lists are
/// indistinguishable, so removal by structural equality may drop the
/// wrong instance when duplicates exist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSheetDescriptor {
    pub rules: Vec<StyleRule>,
}

impl StyleSheetDescriptor {
    pub fn from_rule_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rules: texts
                .into_iter()
                .map(|t| StyleRule { rule_text: t.into() })
                .collect(),
        }
    }
}

/// Immutable snapshot of one tree node at serialization time.
///
/// Fully self-contained: applying a mutation never dereferences the
/// original live node. `path` is empty only when the node was
/// unaddressable (detached) at snapshot time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeDescriptor {
    #[serde(rename_all = "camelCase")]
    Element {
        name: String,
        path: String,
        attributes: AttributeMap,
        /// Serialized subtree content, present only when the descriptor
        /// must materialize an inserted node in one step.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inner_markup: Option<String>,
        /// Present only for style-bearing nodes that currently have rules.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style_rules: Option<StyleSheetDescriptor>,
    },
    Text {
        path: String,
        value: String,
    },
    Comment {
        path: String,
        value: String,
    },
    Document {
        path: String,
    },
    DocumentFragment {
        path: String,
    },
    #[serde(rename_all = "camelCase")]
    Other {
        name: String,
        path: String,
    },
}

impl NodeDescriptor {
    pub fn path(&self) -> &str {
        match self {
            NodeDescriptor::Element { path, .. }
            | NodeDescriptor::Text { path, .. }
            | NodeDescriptor::Comment { path, .. }
            | NodeDescriptor::Document { path }
            | NodeDescriptor::DocumentFragment { path }
            | NodeDescriptor::Other { path, .. } => path,
        }
    }

    /// Tag name for elements, the symbolic marker otherwise.
    pub fn name(&self) -> &str {
        match self {
            NodeDescriptor::Element { name, .. } | NodeDescriptor::Other { name, .. } => name,
            NodeDescriptor::Text { .. } => TEXT_NODE_NAME,
            NodeDescriptor::Comment { .. } => COMMENT_NODE_NAME,
            NodeDescriptor::Document { .. } => DOCUMENT_NODE_NAME,
            NodeDescriptor::DocumentFragment { .. } => FRAGMENT_NODE_NAME,
        }
    }

    /// Textual payload for text and comment nodes.
    pub fn value(&self) -> Option<&str> {
        match self {
            NodeDescriptor::Text { value, .. } | NodeDescriptor::Comment { value, .. } => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn attributes(&self) -> Option<&AttributeMap> {
        match self {
            NodeDescriptor::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn inner_markup(&self) -> Option<&str> {
        match self {
            NodeDescriptor::Element { inner_markup, .. } => inner_markup.as_deref(),
            _ => None,
        }
    }

    pub fn style_rules(&self) -> Option<&StyleSheetDescriptor> {
        match self {
            NodeDescriptor::Element { style_rules, .. } => style_rules.as_ref(),
            _ => None,
        }
    }
}

/// Portable form of one observed change event.
///
/// Records are only valid applied in the exact order they were produced:
/// a later record's paths assume the replica already reflects every
/// earlier record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MutationRecord {
    #[serde(rename_all = "camelCase")]
    Attributes {
        #[serde(default)]
        target: Option<NodeDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_sibling: Option<NodeDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next_sibling: Option<NodeDescriptor>,
        #[serde(default)]
        attribute_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribute_namespace: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    CharacterData {
        #[serde(default)]
        target: Option<NodeDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_sibling: Option<NodeDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next_sibling: Option<NodeDescriptor>,
    },
    #[serde(rename_all = "camelCase")]
    ChildList {
        #[serde(default)]
        target: Option<NodeDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_sibling: Option<NodeDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next_sibling: Option<NodeDescriptor>,
        #[serde(default)]
        added_nodes: Vec<NodeDescriptor>,
        #[serde(default)]
        removed_nodes: Vec<NodeDescriptor>,
    },
}

impl MutationRecord {
    pub fn target(&self) -> Option<&NodeDescriptor> {
        match self {
            MutationRecord::Attributes { target, .. }
            | MutationRecord::CharacterData { target, .. }
            | MutationRecord::ChildList { target, .. } => target.as_ref(),
        }
    }

    pub fn previous_sibling(&self) -> Option<&NodeDescriptor> {
        match self {
            MutationRecord::Attributes {
                previous_sibling, ..
            }
            | MutationRecord::CharacterData {
                previous_sibling, ..
            }
            | MutationRecord::ChildList {
                previous_sibling, ..
            } => previous_sibling.as_ref(),
        }
    }

    pub fn next_sibling(&self) -> Option<&NodeDescriptor> {
        match self {
            MutationRecord::Attributes { next_sibling, .. }
            | MutationRecord::CharacterData { next_sibling, .. }
            | MutationRecord::ChildList { next_sibling, .. } => next_sibling.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_record_wire_shape_is_camel_case_tagged() {
        let record = MutationRecord::ChildList {
            target: Some(NodeDescriptor::Element {
                name: "ul".to_string(),
                path: "/ul".to_string(),
                attributes: Vec::new(),
                inner_markup: None,
                style_rules: None,
            }),
            previous_sibling: None,
            next_sibling: None,
            added_nodes: vec![NodeDescriptor::Text {
                path: String::new(),
                value: "Milk".to_string(),
            }],
            removed_nodes: Vec::new(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "childList");
        assert_eq!(json["target"]["kind"], "element");
        assert_eq!(json["addedNodes"][0]["kind"], "text");
        assert_eq!(json["addedNodes"][0]["value"], "Milk");
        assert!(
            json["target"].get("innerMarkup").is_none(),
            "absent inner markup must not serialize"
        );

        let back: MutationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn attributes_record_round_trips_namespace() {
        let record = MutationRecord::Attributes {
            target: Some(NodeDescriptor::Element {
                name: "p".to_string(),
                path: "/p".to_string(),
                attributes: vec![("style".to_string(), "color:red;".to_string())],
                inner_markup: None,
                style_rules: None,
            }),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some("style".to_string()),
            attribute_namespace: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: MutationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn style_sheet_descriptor_serializes_as_rule_list() {
        let sheet = StyleSheetDescriptor::from_rule_texts(["p{color:red;}"]);
        let json = serde_json::to_value(&sheet).unwrap();
        assert_eq!(json[0]["ruleText"], "p{color:red;}");
    }
}
