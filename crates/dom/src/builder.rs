//! Token stream → owned node tree.
//!
//! Tolerant of unbalanced markup: a stray end tag with no matching open
//! element is ignored, and elements still open at end of input are closed
//! implicitly.

use std::fmt;

use crate::tokenizer::{Token, tokenize};
use crate::types::{Id, Namespace, Node, StyleSheet, assign_node_ids};

/// Input produced no markup content at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseError;

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("markup input contains no parseable content")
    }
}

impl std::error::Error for ParseError {}

/// Parse markup into a document node with ids assigned in document order.
pub fn parse_document(input: &str) -> Result<Node, ParseError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(ParseError);
    }
    let mut doc = build_document(tokens);
    assign_node_ids(&mut doc);
    Ok(doc)
}

/// Parse markup as a bare fragment: the would-be children of some element.
/// Empty input yields no nodes. Ids are left unassigned.
pub fn parse_fragment(input: &str) -> Vec<Node> {
    let mut doc = build_document(tokenize(input));
    match &mut doc {
        Node::Document { children, .. } => std::mem::take(children),
        _ => Vec::new(),
    }
}

pub fn build_document(tokens: Vec<Token>) -> Node {
    let mut doctype: Option<String> = None;
    let mut root_children: Vec<Node> = Vec::new();
    let mut open: Vec<OpenElement> = Vec::new();

    for token in tokens {
        match token {
            Token::Doctype(s) => {
                if doctype.is_none() {
                    doctype = Some(s);
                }
            }
            Token::Comment(text) => {
                append(&mut open, &mut root_children, Node::Comment { id: Id::UNSET, text });
            }
            Token::Text(text) => {
                append_text(&mut open, &mut root_children, text);
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let element = OpenElement {
                    namespace: Namespace::for_tag(&name),
                    name,
                    attributes,
                    children: Vec::new(),
                };
                if self_closing {
                    append(&mut open, &mut root_children, element.finish());
                } else {
                    open.push(element);
                }
            }
            Token::EndTag(name) => {
                // Ignore stray end tags instead of letting them close
                // unrelated open elements.
                if !open.iter().any(|e| e.name.eq_ignore_ascii_case(&name)) {
                    log::trace!(target: "dom.builder", "ignoring stray end tag </{name}>");
                    continue;
                }
                while let Some(element) = open.pop() {
                    let matched = element.name.eq_ignore_ascii_case(&name);
                    append(&mut open, &mut root_children, element.finish());
                    if matched {
                        break;
                    }
                }
            }
        }
    }

    // Implicitly close whatever is still open.
    while let Some(element) = open.pop() {
        append(&mut open, &mut root_children, element.finish());
    }

    Node::Document {
        id: Id::UNSET,
        doctype,
        children: root_children,
    }
}

struct OpenElement {
    name: String,
    namespace: Namespace,
    attributes: Vec<(String, Option<String>)>,
    children: Vec<Node>,
}

impl OpenElement {
    fn finish(self) -> Node {
        let sheet = if self.name == "style" {
            let mut css = String::new();
            for c in &self.children {
                if let Node::Text { text, .. } = c {
                    css.push_str(text);
                }
            }
            let sheet = StyleSheet::from_css(&css);
            (!sheet.is_empty()).then_some(sheet)
        } else {
            None
        };
        Node::Element {
            id: Id::UNSET,
            name: self.name,
            namespace: self.namespace,
            attributes: self.attributes,
            sheet,
            children: self.children,
        }
    }
}

fn append(open: &mut [OpenElement], root_children: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root_children.push(node),
    }
}

fn append_text(open: &mut [OpenElement], root_children: &mut Vec<Node>, text: String) {
    let siblings = match open.last_mut() {
        Some(parent) => &mut parent.children,
        None => root_children,
    };
    // Merge adjacent runs so "1 < 2" stays a single text node.
    if let Some(Node::Text { text: last, .. }) = siblings.last_mut() {
        last.push_str(&text);
    } else {
        siblings.push(Node::Text { id: Id::UNSET, text });
    }
}
