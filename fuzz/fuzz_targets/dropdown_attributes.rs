#![no_main]

use dom::{Document, Node};
use libfuzzer_sys::fuzz_target;
use multiselect::{Behaviors, Breakpoint, Controller, Interaction};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let _ = Breakpoint::parse(Some(input)).is_modal_at(512);

    // Attribute values straight from the server must never break attach,
    // filtering or the label update.
    let dropdown = Node::element("div")
        .with_flag("data-multiselect-dropdown")
        .with_attr("data-drupal-selector", input)
        .with_attr("data-multiselect-dropdown-breakpoint", input)
        .with_attr("data-multiselect-dropdown-label-plural", input)
        .with_children([
            Node::element("button").with_flag("data-multiselect-dropdown-toggle"),
            Node::element("dialog")
                .with_flag("data-multiselect-dropdown-dialog")
                .with_children([
                    Node::element("input")
                        .with_attr("type", "search")
                        .with_flag("data-multiselect-dropdown-search")
                        .with_attr("data-multiselect-dropdown-search-character-threshold", input),
                    Node::element("ul")
                        .with_flag("data-multiselect-dropdown-list")
                        .with_child(Node::element("li").with_children([
                            Node::element("input").with_attr("type", "checkbox"),
                            Node::element("label").with_child(Node::text(input)),
                        ])),
                ]),
        ]);
    let mut doc = Document::from_node(Node::document(vec![dropdown]));
    let mut ctrl = Controller::default();
    let mut behaviors = Behaviors::new();
    let root = doc.root();
    let _ = behaviors.attach(&mut ctrl, &mut doc, root);
    let Some(instance) = ctrl.instances(&doc, root).into_iter().next() else {
        return;
    };
    if let Some(search) = ctrl.search_input(&doc, instance) {
        let _ = doc.set_value(search, input);
    }
    for interaction in [
        Interaction::ToggleClick { instance },
        Interaction::SearchInput { instance },
        Interaction::SelectAll { instance },
        Interaction::EscapeKey,
    ] {
        let _ = behaviors.dispatch(&mut ctrl, &mut doc, interaction);
        let _ = behaviors.pump(&mut ctrl, &mut doc);
    }
});
