use dom::SelectorList;

/// Attribute names and prebuilt selectors derived from the root marker.
#[derive(Clone, Debug)]
pub(crate) struct Markers {
    pub(crate) root: SelectorList,
    pub(crate) toggle: SelectorList,
    pub(crate) dialog: SelectorList,
    pub(crate) dialog_close: SelectorList,
    pub(crate) select_all: SelectorList,
    pub(crate) select_none: SelectorList,
    pub(crate) search: SelectorList,
    pub(crate) list: SelectorList,
    pub(crate) submit: SelectorList,
    pub(crate) clear: SelectorList,

    pub(crate) open_attr: String,
    pub(crate) persist_open_attr: String,
    pub(crate) breakpoint_attr: String,
    pub(crate) search_threshold_attr: String,
    pub(crate) label_none_attr: String,
    pub(crate) label_single_attr: String,
    pub(crate) label_plural_attr: String,
    pub(crate) label_all_attr: String,

    pub(crate) checkbox: SelectorList,
    pub(crate) list_item: SelectorList,
    pub(crate) label: SelectorList,
    pub(crate) form: SelectorList,
    pub(crate) form_submit: SelectorList,
}

impl Markers {
    pub(crate) fn new(base: &str) -> Self {
        let name = |suffix: &str| format!("{base}-{suffix}");
        let marker = |suffix: &str| SelectorList::attribute(&name(suffix));
        Self {
            root: SelectorList::attribute(base),
            toggle: marker("toggle"),
            dialog: marker("dialog"),
            dialog_close: marker("dialog-close"),
            select_all: marker("select-all"),
            select_none: marker("select-none"),
            search: marker("search"),
            list: marker("list"),
            submit: marker("submit"),
            clear: marker("clear"),

            open_attr: name("open"),
            persist_open_attr: name("persist-open"),
            breakpoint_attr: name("breakpoint"),
            search_threshold_attr: name("search-character-threshold"),
            label_none_attr: name("label-none"),
            label_single_attr: name("label-single"),
            label_plural_attr: name("label-plural"),
            label_all_attr: name("label-all"),

            checkbox: SelectorList::attribute_eq("type", "checkbox"),
            list_item: SelectorList::tag("li"),
            label: SelectorList::tag("label"),
            form: SelectorList::tag("form"),
            form_submit: SelectorList::attribute_eq("type", "submit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{Document, Node};

    #[test]
    fn sub_markers_follow_the_base_attribute() {
        let doc = Document::from_node(Node::document(vec![
            Node::element("div")
                .with_flag("data-picker")
                .with_child(Node::element("button").with_flag("data-picker-toggle")),
        ]));
        let markers = Markers::new("data-picker");
        let root = doc.query_selector(doc.root(), &markers.root);
        let toggle = doc.query_selector(doc.root(), &markers.toggle);
        assert!(root.is_some());
        assert!(toggle.is_some());
        assert_ne!(root, toggle);
        assert_eq!(markers.label_plural_attr, "data-picker-label-plural");
    }
}
