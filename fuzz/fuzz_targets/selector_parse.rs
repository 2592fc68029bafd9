#![no_main]

use dom::{Document, Node, SelectorList, quote_selector_value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(selector) = SelectorList::parse(input) {
        let doc = Document::from_node(Node::document(vec![
            Node::element("div")
                .with_attr("class", "view-content")
                .with_child(Node::element("span").with_attr("data-drupal-selector", input)),
        ]));
        let _ = doc.query_selector_all(doc.root(), &selector);
    }

    // Quoting any value must yield a selector that finds it again.
    let quoted = quote_selector_value(input);
    let selector = SelectorList::parse(&format!("[data-drupal-selector={quoted}]"))
        .expect("quoted attribute selector parses");
    let doc = Document::from_node(Node::document(vec![
        Node::element("span").with_attr("data-drupal-selector", input),
    ]));
    assert!(doc.query_selector(doc.root(), &selector).is_some());
});
