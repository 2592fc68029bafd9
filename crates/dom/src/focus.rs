use crate::document::Document;
use crate::types::Id;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusOptions {
    pub prevent_scroll: bool,
}

impl FocusOptions {
    pub const PREVENT_SCROLL: FocusOptions = FocusOptions {
        prevent_scroll: true,
    };
}

impl Document {
    pub fn active_element(&self) -> Option<Id> {
        self.focused
    }

    /// Whether the last successful `focus` call was allowed to scroll the page.
    pub fn scroll_requested(&self) -> bool {
        self.scroll_requested
    }

    /// Focusable, ignoring visibility: interactive controls, links with an
    /// `href`, and anything carrying `tabindex`.
    pub fn is_focusable(&self, id: Id) -> bool {
        let Ok(el) = self.element(id) else {
            return false;
        };
        if el.has_attr("tabindex") {
            return true;
        }
        if el.has_attr("disabled") {
            return false;
        }
        match &*el.name.to_ascii_lowercase() {
            "button" | "select" | "textarea" | "summary" => true,
            "input" => !el
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden")),
            "a" => el.has_attr("href"),
            _ => false,
        }
    }

    /// Moves focus to `id`. Returns `false` (leaving focus unchanged) when the
    /// element is not focusable or not rendered.
    pub fn focus(&mut self, id: Id, options: FocusOptions) -> bool {
        if !self.is_focusable(id) || self.is_hidden(id) {
            log::trace!(target: "dom.focus", "focus({id}) refused");
            return false;
        }
        self.focused = Some(id);
        self.scroll_requested = !options.prevent_scroll;
        log::trace!(
            target: "dom.focus",
            "focus({id}) prevent_scroll={}",
            options.prevent_scroll
        );
        true
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// `true` if focus rests on `id` or one of its descendants.
    pub fn focus_within(&self, id: Id) -> bool {
        self.focused.is_some_and(|f| self.contains(id, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;

    fn doc() -> Document {
        Document::from_node(Node::document(vec![
            Node::element("div").with_children([
                Node::element("button"),
                Node::element("input").with_attr("type", "hidden"),
                Node::element("ul").with_attr("tabindex", "-1"),
                Node::element("a"),
                Node::element("button").with_flag("disabled"),
            ]),
        ]))
    }

    #[test]
    fn focusable_elements() {
        let doc = doc();
        assert!(doc.is_focusable(Id(2)));
        assert!(!doc.is_focusable(Id(3)));
        assert!(doc.is_focusable(Id(4)));
        assert!(!doc.is_focusable(Id(5)));
        assert!(!doc.is_focusable(Id(6)));
        assert!(!doc.is_focusable(Id(1)));
    }

    #[test]
    fn focus_records_scroll_preference() {
        let mut doc = doc();
        assert!(doc.focus(Id(2), FocusOptions::default()));
        assert!(doc.scroll_requested());
        assert!(doc.focus(Id(4), FocusOptions::PREVENT_SCROLL));
        assert!(!doc.scroll_requested());
        assert_eq!(doc.active_element(), Some(Id(4)));
        assert!(doc.focus_within(Id(1)));
    }

    #[test]
    fn refused_focus_keeps_previous_target() {
        let mut doc = doc();
        assert!(doc.focus(Id(2), FocusOptions::PREVENT_SCROLL));
        assert!(!doc.focus(Id(1), FocusOptions::PREVENT_SCROLL));
        assert_eq!(doc.active_element(), Some(Id(2)));
    }

    #[test]
    fn removing_the_focused_node_drops_focus() {
        let mut doc = doc();
        assert!(doc.focus(Id(2), FocusOptions::PREVENT_SCROLL));
        doc.remove(Id(1)).unwrap();
        assert_eq!(doc.active_element(), None);
    }
}
