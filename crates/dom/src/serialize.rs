//! Node tree → markup text.
//!
//! Emission rules:
//! - Attribute order is preserved; values are double-quoted and escaped,
//!   valueless attributes stay bare.
//! - Text is entity-escaped except inside rawtext elements.
//! - Void elements emit no end tag; their children are never emitted.
//! - Output is normalized (lowercase names, quoted values), so
//!   serialize → parse → serialize is stable.

use crate::entities::{escape_attribute, escape_text};
use crate::tokenizer::{is_rawtext_element, is_void_element};
use crate::types::Node;

/// Serialize a node, including the node itself (and doctype for documents).
pub fn serialize(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node, false);
    out
}

/// Serialize only a node's children: its inner markup.
pub fn serialize_children(node: &Node) -> String {
    let mut out = String::new();
    let rawtext = node
        .element_name()
        .is_some_and(is_rawtext_element);
    if let Some(children) = node.children() {
        for c in children {
            write_node(&mut out, c, rawtext);
        }
    }
    out
}

fn write_node(out: &mut String, node: &Node, rawtext: bool) {
    match node {
        Node::Document {
            doctype, children, ..
        } => {
            if let Some(dt) = doctype {
                out.push_str("<!DOCTYPE ");
                out.push_str(dt);
                out.push('>');
            }
            for c in children {
                write_node(out, c, false);
            }
        }
        Node::Element {
            name,
            attributes,
            children,
            ..
        } => {
            out.push('<');
            out.push_str(name);
            for (k, v) in attributes {
                out.push(' ');
                out.push_str(k);
                if let Some(v) = v {
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(v));
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(name) {
                return;
            }
            let rawtext = is_rawtext_element(name);
            for c in children {
                write_node(out, c, rawtext);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Text { text, .. } => {
            if rawtext {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        Node::Comment { text, .. } => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::parse_document;

    #[test]
    fn serialize_round_trips_normalized_markup() {
        let samples = [
            "<p>Hi</p>",
            "<ul><li>Coffee</li><li>Tea</li></ul>",
            r#"<p style="color:red;">Hi</p>"#,
            "<!DOCTYPE html><html><body><p>x</p></body></html>",
            "<div><!--note--><br>tail</div>",
            "<input disabled>",
        ];
        for markup in samples {
            let doc = parse_document(markup).unwrap();
            assert_eq!(serialize(&doc), markup);
            let again = parse_document(&serialize(&doc)).unwrap();
            assert_eq!(serialize(&again), markup, "second pass must be stable");
        }
    }

    #[test]
    fn serialize_escapes_text_and_attribute_values() {
        let doc = parse_document(r#"<p title="a &amp; b">x &lt; y</p>"#).unwrap();
        assert_eq!(serialize(&doc), r#"<p title="a &amp; b">x &lt; y</p>"#);
    }

    #[test]
    fn serialize_keeps_rawtext_verbatim() {
        let markup = "<style>a > b { color: red; }</style>";
        let doc = parse_document(markup).unwrap();
        assert_eq!(serialize(&doc), markup);
    }

    #[test]
    fn serialize_children_emits_inner_markup_only() {
        let doc = parse_document("<ul><li>Coffee</li></ul>").unwrap();
        let ul = &doc.children().unwrap()[0];
        assert_eq!(serialize_children(ul), "<li>Coffee</li>");
        assert_eq!(serialize_children(&ul.children().unwrap()[0]), "Coffee");
    }
}
