use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mirror::{DomMirror, MutationRecord, NodeDescriptor, path::path_of, serialize_mutations};
use mirror::{ChangeEvent, EventNode};

const ROWS: usize = 200;

fn make_table_markup(rows: usize) -> String {
    let mut out = String::from("<table>");
    for r in 0..rows {
        out.push_str(&format!(
            "<tr><td>cell {r}.0</td><td>cell {r}.1</td><td>cell {r}.2</td></tr>"
        ));
    }
    out.push_str("</table>");
    out
}

fn bench_path_of_deep_sibling(c: &mut Criterion) {
    let doc = dom::parse_document(&make_table_markup(ROWS)).unwrap();
    let last_cell = {
        let table = &doc.children().unwrap()[0];
        let row = table.children().unwrap().last().unwrap();
        row.children().unwrap().last().unwrap().id()
    };
    c.bench_function("bench_path_of_deep_sibling", |b| {
        b.iter(|| {
            let path = path_of(black_box(&doc), black_box(last_cell));
            black_box(path);
        });
    });
}

fn bench_serialize_mutations(c: &mut Criterion) {
    let doc = dom::parse_document(&make_table_markup(ROWS)).unwrap();
    let table_id = doc.children().unwrap()[0].id();
    let row_ids: Vec<_> = doc.children().unwrap()[0]
        .children()
        .unwrap()
        .iter()
        .map(|r| r.id())
        .collect();
    let events: Vec<ChangeEvent> = row_ids
        .iter()
        .map(|&id| ChangeEvent::ChildList {
            target: EventNode::Live(table_id),
            added: vec![EventNode::Live(id)],
            removed: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
        })
        .collect();
    c.bench_function("bench_serialize_mutations", |b| {
        b.iter(|| {
            let records = serialize_mutations(black_box(&doc), black_box(&events));
            black_box(records.len());
        });
    });
}

fn bench_apply_attribute_batch(c: &mut Criterion) {
    let markup = make_table_markup(ROWS);
    let records: Vec<MutationRecord> = (0..ROWS)
        .map(|r| MutationRecord::Attributes {
            target: Some(NodeDescriptor::Element {
                name: "tr".to_string(),
                path: format!("/table/tr[{}]", r + 1),
                attributes: vec![("class".to_string(), "seen".to_string())],
                inner_markup: None,
                style_rules: None,
            }),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some("class".to_string()),
            attribute_namespace: None,
        })
        .collect();
    c.bench_function("bench_apply_attribute_batch", |b| {
        b.iter(|| {
            let mut mirror = DomMirror::new(&markup, None).unwrap();
            mirror.apply_mutations(black_box(&records)).unwrap();
            black_box(mirror.dom().len());
        });
    });
}

criterion_group!(
    benches,
    bench_path_of_deep_sibling,
    bench_serialize_mutations,
    bench_apply_attribute_batch
);
criterion_main!(benches);
