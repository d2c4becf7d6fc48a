#![no_main]

use libfuzzer_sys::fuzz_target;

// Parsing must never panic, and serialized output must reparse to a tree
// that serializes identically (normalization reaches a fixed point after
// one round).
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(doc) = dom::parse_document(input) else {
        return;
    };
    let first = dom::serialize(&doc);
    let Ok(again) = dom::parse_document(&first) else {
        return;
    };
    assert_eq!(first, dom::serialize(&again));
});
