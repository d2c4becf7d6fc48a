//! End-to-end convergence: observe changes on a live source tree,
//! serialize them, replay them against a fresh replica, and compare the
//! serialized markup of both sides.
//!
//! Events are serialized as they are observed (each against the source
//! state it left behind), which is how a mutation observer hands them
//! over in practice.

use dom::{Id, Node};
use mirror::{ChangeEvent, DomMirror, EventNode, MutationRecord, serialize_mutations};

fn child_id(node: &Node, route: &[usize]) -> Id {
    let mut current = node;
    for &i in route {
        current = &current.children().unwrap()[i];
    }
    current.id()
}

#[test]
fn mixed_batch_converges() {
    let markup = r#"<div><p id="intro">Hello</p><ul><li>Coffee</li><li>Tea</li></ul></div>"#;
    let mut source = dom::parse_document(markup).unwrap();
    let mut records: Vec<MutationRecord> = Vec::new();

    // Replace the paragraph text.
    let text_id = child_id(&source, &[0, 0, 0]);
    {
        let p = &mut source.children_mut().unwrap()[0].children_mut().unwrap()[0];
        p.children_mut().unwrap()[0].set_text("Hi there");
    }
    records.extend(serialize_mutations(
        &source,
        &[ChangeEvent::CharacterData {
            target: EventNode::Live(text_id),
        }],
    ));

    // Append a third list item.
    let ul_id = child_id(&source, &[0, 1]);
    let tea_id = child_id(&source, &[0, 1, 1]);
    {
        let ul = &mut source.children_mut().unwrap()[0].children_mut().unwrap()[1];
        ul.children_mut().unwrap().push(
            dom::parse_fragment("<li>Milk</li>").remove(0),
        );
    }
    dom::assign_node_ids(&mut source);
    let milk_id = child_id(&source, &[0, 1, 2]);
    records.extend(serialize_mutations(
        &source,
        &[ChangeEvent::ChildList {
            target: EventNode::Live(ul_id),
            added: vec![EventNode::Live(milk_id)],
            removed: Vec::new(),
            previous_sibling: Some(EventNode::Live(tea_id)),
            next_sibling: None,
        }],
    ));

    // Mark the list.
    {
        let ul = &mut source.children_mut().unwrap()[0].children_mut().unwrap()[1];
        ul.set_attribute("class", "menu");
    }
    records.extend(serialize_mutations(
        &source,
        &[ChangeEvent::Attributes {
            target: EventNode::Live(ul_id),
            attribute_name: "class".to_string(),
            attribute_namespace: None,
        }],
    ));

    // Drop the first list item; the detached node travels with the event.
    let coffee = {
        let ul = &mut source.children_mut().unwrap()[0].children_mut().unwrap()[1];
        ul.children_mut().unwrap().remove(0)
    };
    records.extend(serialize_mutations(
        &source,
        &[ChangeEvent::ChildList {
            target: EventNode::Live(ul_id),
            added: Vec::new(),
            removed: vec![EventNode::Detached(coffee)],
            previous_sibling: None,
            next_sibling: Some(EventNode::Live(tea_id)),
        }],
    ));

    let mut replica = DomMirror::new(markup, None).unwrap();
    replica.apply_mutations(&records).unwrap();
    assert_eq!(replica.dom(), dom::serialize(&source));
    assert_eq!(
        replica.dom(),
        r#"<div><p id="intro">Hi there</p><ul class="menu"><li>Tea</li><li>Milk</li></ul></div>"#
    );
}

#[test]
fn stylesheet_tracking_follows_insert_and_remove() {
    let markup = "<div></div>";
    let mut source = dom::parse_document(markup).unwrap();
    let mut records: Vec<MutationRecord> = Vec::new();

    // A <style> node lands in the source with a rule inserted
    // programmatically, so the rule is absent from its markup text.
    let div_id = child_id(&source, &[0]);
    {
        let div = &mut source.children_mut().unwrap()[0];
        let mut style = dom::parse_fragment("<style></style>").remove(0);
        *style.sheet_mut().unwrap() = Some(dom::StyleSheet {
            rules: vec!["p{color:red;}".to_string()],
        });
        div.children_mut().unwrap().push(style);
    }
    dom::assign_node_ids(&mut source);
    let style_id = child_id(&source, &[0, 0]);
    records.extend(serialize_mutations(
        &source,
        &[ChangeEvent::ChildList {
            target: EventNode::Live(div_id),
            added: vec![EventNode::Live(style_id)],
            removed: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
        }],
    ));

    let mut replica = DomMirror::new(markup, None).unwrap();
    replica.apply_mutations(&records).unwrap();
    assert_eq!(replica.style_sheets().len(), 1);
    assert_eq!(
        replica.style_sheets()[0].rules[0].rule_text,
        "p{color:red;}"
    );
    assert_eq!(replica.dom(), dom::serialize(&source));

    // Removing the same node drops the tracked sheet again.
    let style = {
        let div = &mut source.children_mut().unwrap()[0];
        div.children_mut().unwrap().remove(0)
    };
    let removal = serialize_mutations(
        &source,
        &[ChangeEvent::ChildList {
            target: EventNode::Live(div_id),
            added: Vec::new(),
            removed: vec![EventNode::Detached(style)],
            previous_sibling: None,
            next_sibling: None,
        }],
    );
    replica.apply_mutations(&removal).unwrap();
    assert!(replica.style_sheets().is_empty());
    assert_eq!(replica.dom(), dom::serialize(&source));
}

#[test]
fn records_survive_json_transport() {
    let markup = "<ul><li>Coffee</li><li>Tea</li></ul>";
    let mut source = dom::parse_document(markup).unwrap();
    let ul_id = child_id(&source, &[0]);
    let tea_id = child_id(&source, &[0, 1]);
    {
        let ul = &mut source.children_mut().unwrap()[0];
        ul.children_mut().unwrap().push(
            dom::parse_fragment("<li>Milk</li>").remove(0),
        );
    }
    dom::assign_node_ids(&mut source);
    let milk_id = child_id(&source, &[0, 2]);
    let records = serialize_mutations(
        &source,
        &[ChangeEvent::ChildList {
            target: EventNode::Live(ul_id),
            added: vec![EventNode::Live(milk_id)],
            removed: Vec::new(),
            previous_sibling: Some(EventNode::Live(tea_id)),
            next_sibling: None,
        }],
    );

    // Through the wire and back: the consumer may be a different process.
    let json = serde_json::to_string(&records).unwrap();
    let decoded: Vec<MutationRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, records);

    let mut replica = DomMirror::new(markup, None).unwrap();
    replica.apply_mutations(&decoded).unwrap();
    assert_eq!(replica.dom(), dom::serialize(&source));
}

#[test]
fn repeated_small_batches_converge() {
    let markup = "<ol></ol>";
    let mut source = dom::parse_document(markup).unwrap();
    let mut replica = DomMirror::new(markup, None).unwrap();
    let ol_id = child_id(&source, &[0]);

    for n in 1..=5 {
        let previous = source.children().unwrap()[0]
            .children()
            .unwrap()
            .last()
            .map(Node::id);
        {
            let ol = &mut source.children_mut().unwrap()[0];
            ol.children_mut()
                .unwrap()
                .push(dom::parse_fragment(&format!("<li>item {n}</li>")).remove(0));
        }
        dom::assign_node_ids(&mut source);
        let added_id = source.children().unwrap()[0]
            .children()
            .unwrap()
            .last()
            .unwrap()
            .id();
        let records = serialize_mutations(
            &source,
            &[ChangeEvent::ChildList {
                target: EventNode::Live(ol_id),
                added: vec![EventNode::Live(added_id)],
                removed: Vec::new(),
                previous_sibling: previous.map(EventNode::Live),
                next_sibling: None,
            }],
        );
        replica.apply_mutations(&records).unwrap();
        assert_eq!(replica.dom(), dom::serialize(&source), "diverged at item {n}");
    }
}
