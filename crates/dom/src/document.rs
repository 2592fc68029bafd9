use crate::dialog::DialogMode;
use crate::events::DomEvent;
use crate::text::collapse_whitespace;
use crate::types::{Attribute, Id, Node, NodeId};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    UnknownNode(Id),
    NotAnElement(Id),
    NotADialog(Id),
    NotAForm(Id),
    /// The node has no parent, e.g. the document itself.
    Detached(Id),
}

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomError::UnknownNode(id) => write!(f, "node {id} is not in the document"),
            DomError::NotAnElement(id) => write!(f, "node {id} is not an element"),
            DomError::NotADialog(id) => write!(f, "element {id} is not a <dialog>"),
            DomError::NotAForm(id) => write!(f, "element {id} is not a <form>"),
            DomError::Detached(id) => write!(f, "node {id} has no parent"),
        }
    }
}

impl std::error::Error for DomError {}

/// Inline `display` value as set by scripts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    Unset,
    None,
    Initial,
}

#[derive(Debug)]
pub(crate) struct ElementData {
    pub(crate) name: Arc<str>,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) display: Display,
    pub(crate) dialog: DialogMode,
    pub(crate) checked: bool,
    pub(crate) value: String,
}

impl ElementData {
    fn new(name: Arc<str>, attributes: Vec<Attribute>) -> Self {
        // Seed control state from markup: the attribute is the default, the
        // field is the live value.
        let checked = attributes
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("checked"));
        let value = attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("value"))
            .and_then(|(_, v)| v.clone())
            .unwrap_or_default();
        let dialog = if name.eq_ignore_ascii_case("dialog")
            && attributes.iter().any(|(k, _)| k.eq_ignore_ascii_case("open"))
        {
            DialogMode::NonModal
        } else {
            DialogMode::Closed
        };
        Self {
            name,
            attributes,
            display: Display::Unset,
            dialog,
            checked,
            value,
        }
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub(crate) fn has_attr(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: Option<String>) {
        if let Some(slot) = self
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            slot.1 = value;
        } else {
            self.attributes.push((Arc::from(name), value));
        }
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        before != self.attributes.len()
    }
}

#[derive(Debug)]
enum NodeKind {
    Document { doctype: Option<String> },
    Element(ElementData),
    Text { text: String },
    Comment { text: String },
}

#[derive(Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<Id>,
    children: Vec<Id>,
}

/// Live document: an arena of nodes addressed by [`Id`].
#[derive(Debug)]
pub struct Document {
    /// Slots of removed nodes are emptied and reused; ids are not.
    nodes: Vec<Option<NodeRecord>>,
    free: Vec<usize>,
    live: HashMap<Id, usize>,
    next_id: NodeId,
    pub(crate) focused: Option<Id>,
    pub(crate) scroll_requested: bool,
    viewport_width: u32,
    events: VecDeque<DomEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1024;

    /// An empty document containing only the document node.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            live: HashMap::new(),
            next_id: 0,
            focused: None,
            scroll_requested: false,
            viewport_width: Self::DEFAULT_VIEWPORT_WIDTH,
            events: VecDeque::new(),
        };
        let root = doc.alloc(NodeKind::Document { doctype: None }, None);
        debug_assert_eq!(root, Id::DOCUMENT);
        doc
    }

    /// Loads markup. A `Node::Document` becomes the document node itself; any
    /// other node is appended as its only child.
    pub fn from_node(node: Node) -> Self {
        let mut doc = Self::new();
        match node {
            Node::Document { doctype, children } => {
                if let Some(record) = doc.record_mut(Id::DOCUMENT) {
                    record.kind = NodeKind::Document { doctype };
                }
                let mut roots = Vec::new();
                for child in children {
                    doc.insert_tree(Id::DOCUMENT, child, &mut roots);
                }
            }
            other => {
                doc.insert_tree(Id::DOCUMENT, other, &mut Vec::new());
            }
        }
        doc
    }

    pub fn root(&self) -> Id {
        Id::DOCUMENT
    }

    pub fn doctype(&self) -> Option<&str> {
        match self.record(Id::DOCUMENT).map(|r| &r.kind) {
            Some(NodeKind::Document { doctype }) => doctype.as_deref(),
            _ => None,
        }
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    // ---------------------------------------------------------------------
    // Tree structure
    // ---------------------------------------------------------------------

    /// Appends freshly described markup under `parent` and returns the id of
    /// its first top-level node, `None` for an empty fragment.
    pub fn append(&mut self, parent: Id, node: Node) -> Result<Option<Id>, DomError> {
        let record = self.record(parent).ok_or(DomError::UnknownNode(parent))?;
        if !matches!(record.kind, NodeKind::Document { .. } | NodeKind::Element(_)) {
            return Err(DomError::NotAnElement(parent));
        }
        let mut roots = Vec::new();
        self.insert_tree(parent, node, &mut roots);
        Ok(roots.first().copied())
    }

    /// Swaps `target` and its subtree for newly rendered markup, keeping the
    /// position among its siblings. This is how a partial reload lands.
    ///
    /// A fragment's top-level nodes all take the old slot, in order. Returns
    /// the first of them; an empty fragment just removes `target` and yields
    /// `None`.
    pub fn replace_subtree(&mut self, target: Id, node: Node) -> Result<Option<Id>, DomError> {
        let parent = self
            .record(target)
            .ok_or(DomError::UnknownNode(target))?
            .parent
            .ok_or(DomError::Detached(target))?;
        let mut roots = Vec::new();
        self.insert_tree(parent, node, &mut roots);

        // insert_tree appended at the end; move into the old slot.
        if let Some(siblings) = self.record_mut(parent).map(|r| &mut r.children) {
            siblings.truncate(siblings.len() - roots.len());
            let pos = siblings
                .iter()
                .position(|id| *id == target)
                .unwrap_or(siblings.len());
            siblings.splice(pos..pos, roots.iter().copied());
        }
        self.remove(target)?;
        log::debug!(target: "dom", "replaced subtree {target} with {roots:?}");
        Ok(roots.first().copied())
    }

    /// Detaches and drops `id` with all descendants. Focus inside the removed
    /// subtree is lost.
    pub fn remove(&mut self, id: Id) -> Result<(), DomError> {
        if id == Id::DOCUMENT {
            return Err(DomError::Detached(id));
        }
        let parent = self.record(id).ok_or(DomError::UnknownNode(id))?.parent;
        if let Some(record) = parent.and_then(|p| self.record_mut(p)) {
            record.children.retain(|k| *k != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(index) = self.live.remove(&current) else {
                continue;
            };
            if let Some(record) = self.nodes.get_mut(index).and_then(Option::take) {
                stack.extend(record.children);
            }
            self.free.push(index);
            if self.focused == Some(current) {
                self.focused = None;
            }
        }
        Ok(())
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.live.contains_key(&id)
    }

    pub fn parent(&self, id: Id) -> Option<Id> {
        self.record(id).and_then(|r| r.parent)
    }

    pub fn children(&self, id: Id) -> &[Id] {
        self.record(id).map(|r| r.children.as_slice()).unwrap_or(&[])
    }

    /// Pre-order walk over the descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: Id) -> Descendants<'_> {
        let mut stack: Vec<Id> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Inclusive ancestor chain starting at `id`.
    pub fn ancestors(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        std::iter::successors(self.contains_node(id).then_some(id), |cur| self.parent(*cur))
    }

    /// `true` if `other` is `id` or one of its descendants.
    pub fn contains(&self, id: Id, other: Id) -> bool {
        self.ancestors(other).any(|a| a == id)
    }

    // ---------------------------------------------------------------------
    // Elements & attributes
    // ---------------------------------------------------------------------

    pub fn is_element(&self, id: Id) -> bool {
        self.element(id).is_ok()
    }

    pub fn tag_name(&self, id: Id) -> Option<&str> {
        self.element(id).ok().map(|e| &*e.name)
    }

    pub fn attributes(&self, id: Id) -> &[Attribute] {
        self.element(id)
            .map(|e| e.attributes.as_slice())
            .unwrap_or(&[])
    }

    /// Attribute value; a boolean attribute reads as `""`.
    pub fn attr(&self, id: Id, name: &str) -> Option<&str> {
        self.element(id).ok().and_then(|e| e.attr(name))
    }

    pub fn has_attr(&self, id: Id, name: &str) -> bool {
        self.element(id).is_ok_and(|e| e.has_attr(name))
    }

    pub fn set_attr(&mut self, id: Id, name: &str, value: &str) -> Result<(), DomError> {
        self.element_mut(id)?.set_attr(name, Some(value.to_string()));
        Ok(())
    }

    /// Removes the attribute; returns `true` if it was present.
    pub fn remove_attr(&mut self, id: Id, name: &str) -> Result<bool, DomError> {
        Ok(self.element_mut(id)?.remove_attr(name))
    }

    // ---------------------------------------------------------------------
    // Text
    // ---------------------------------------------------------------------

    /// Concatenated text of all descendant text nodes, like `textContent`.
    pub fn text_content(&self, id: Id) -> String {
        let mut out = String::new();
        if let Some(NodeKind::Text { text }) = self.record(id).map(|r| &r.kind) {
            out.push_str(text);
            return out;
        }
        for node in self.descendants(id) {
            if let Some(NodeKind::Text { text }) = self.record(node).map(|r| &r.kind) {
                out.push_str(text);
            }
        }
        out
    }

    /// Rendered-ish text: `text_content` with whitespace collapsed.
    pub fn inner_text(&self, id: Id) -> String {
        collapse_whitespace(&self.text_content(id))
    }

    /// Replaces every child of `id` with a single text node.
    pub fn set_text_content(&mut self, id: Id, text: &str) -> Result<(), DomError> {
        self.element(id)?;
        for child in self.children(id).to_vec() {
            self.remove(child)?;
        }
        if !text.is_empty() {
            self.insert_tree(id, Node::text(text), &mut Vec::new());
        }
        Ok(())
    }

    pub fn text(&self, id: Id) -> Option<&str> {
        match self.record(id).map(|r| &r.kind) {
            Some(NodeKind::Text { text }) | Some(NodeKind::Comment { text }) => Some(text),
            _ => None,
        }
    }

    pub fn is_comment(&self, id: Id) -> bool {
        matches!(
            self.record(id).map(|r| &r.kind),
            Some(NodeKind::Comment { .. })
        )
    }

    // ---------------------------------------------------------------------
    // Style
    // ---------------------------------------------------------------------

    pub fn display(&self, id: Id) -> Display {
        self.element(id).map(|e| e.display).unwrap_or_default()
    }

    pub fn set_display(&mut self, id: Id, display: Display) -> Result<(), DomError> {
        self.element_mut(id)?.display = display;
        Ok(())
    }

    /// `true` when the element or any ancestor is `display: none`, or when it
    /// sits inside a closed dialog.
    pub fn is_hidden(&self, id: Id) -> bool {
        self.ancestors(id).any(|a| {
            self.element(a).is_ok_and(|e| {
                e.display == Display::None
                    || (e.name.eq_ignore_ascii_case("dialog") && e.dialog == DialogMode::Closed)
            })
        })
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    /// Drains queued events in the order they were raised.
    pub fn take_events(&mut self) -> Vec<DomEvent> {
        self.events.drain(..).collect()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub(crate) fn push_event(&mut self, event: DomEvent) {
        log::trace!(target: "dom", "queue event: {event:?}");
        self.events.push_back(event);
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    pub(crate) fn element(&self, id: Id) -> Result<&ElementData, DomError> {
        match self.record(id).map(|r| &r.kind) {
            Some(NodeKind::Element(data)) => Ok(data),
            Some(_) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::UnknownNode(id)),
        }
    }

    pub(crate) fn element_mut(&mut self, id: Id) -> Result<&mut ElementData, DomError> {
        match self.record_mut(id).map(|r| &mut r.kind) {
            Some(NodeKind::Element(data)) => Ok(data),
            Some(_) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::UnknownNode(id)),
        }
    }

    fn record(&self, id: Id) -> Option<&NodeRecord> {
        let index = *self.live.get(&id)?;
        self.nodes.get(index)?.as_ref()
    }

    fn record_mut(&mut self, id: Id) -> Option<&mut NodeRecord> {
        let index = *self.live.get(&id)?;
        self.nodes.get_mut(index)?.as_mut()
    }

    fn alloc(&mut self, kind: NodeKind, parent: Option<Id>) -> Id {
        let id = Id(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let record = NodeRecord {
            kind,
            parent,
            children: Vec::new(),
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.nodes[index] = Some(record);
                index
            }
            None => {
                self.nodes.push(Some(record));
                self.nodes.len() - 1
            }
        };
        self.live.insert(id, index);
        if let Some(parent) = parent
            && let Some(record) = self.record_mut(parent)
        {
            record.children.push(id);
        }
        id
    }

    /// Appends `node` under `parent`, pushing the ids of the nodes that land
    /// directly under `parent` onto `roots`.
    fn insert_tree(&mut self, parent: Id, node: Node, roots: &mut Vec<Id>) {
        match node {
            Node::Document { children, .. } => {
                // A nested document fragment flattens into its children.
                for child in children {
                    self.insert_tree(parent, child, roots);
                }
            }
            Node::Element {
                name,
                attributes,
                children,
            } => {
                let id = self.alloc(
                    NodeKind::Element(ElementData::new(name, attributes)),
                    Some(parent),
                );
                let mut nested = Vec::new();
                for child in children {
                    self.insert_tree(id, child, &mut nested);
                }
                roots.push(id);
            }
            Node::Text { text } => roots.push(self.alloc(NodeKind::Text { text }, Some(parent))),
            Node::Comment { text } => {
                roots.push(self.alloc(NodeKind::Comment { text }, Some(parent)))
            }
        }
    }
}

/// Iterator returned by [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<Id>,
}

impl Iterator for Descendants<'_> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::from_node(Node::document(vec![
            Node::element("div")
                .with_attr("class", "outer")
                .with_children([
                    Node::element("span").with_child(Node::text("Hello ")),
                    Node::element("span").with_child(Node::text("world")),
                ]),
            Node::element("p").with_child(Node::text("after")),
        ]))
    }

    #[test]
    fn assigns_ids_in_document_order() {
        let doc = sample();
        let order: Vec<Id> = doc.descendants(doc.root()).collect();
        assert_eq!(order, (1..=7).map(Id).collect::<Vec<_>>());
        assert_eq!(doc.tag_name(Id(1)), Some("div"));
        assert_eq!(doc.tag_name(Id(6)), Some("p"));
        assert_eq!(doc.doctype(), Some("html"));
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let doc = sample();
        assert_eq!(doc.text_content(Id(1)), "Hello world");
        assert_eq!(doc.inner_text(Id(1)), "Hello world");
    }

    #[test]
    fn set_text_content_replaces_children() {
        let mut doc = sample();
        doc.set_text_content(Id(1), "replaced").unwrap();
        assert_eq!(doc.children(Id(1)).len(), 1);
        assert_eq!(doc.text_content(Id(1)), "replaced");
        assert!(!doc.contains_node(Id(2)));
    }

    #[test]
    fn attributes_are_case_insensitive() {
        let mut doc = sample();
        assert_eq!(doc.attr(Id(1), "CLASS"), Some("outer"));
        doc.set_attr(Id(1), "aria-expanded", "true").unwrap();
        assert_eq!(doc.attr(Id(1), "aria-expanded"), Some("true"));
        assert!(doc.remove_attr(Id(1), "Aria-Expanded").unwrap());
        assert!(!doc.remove_attr(Id(1), "aria-expanded").unwrap());
        assert_eq!(doc.set_attr(Id(3), "x", "y"), Err(DomError::NotAnElement(Id(3))));
    }

    #[test]
    fn replace_subtree_keeps_sibling_position() {
        let mut doc = sample();
        let new_root = doc
            .replace_subtree(Id(1), Node::element("section").with_child(Node::text("new")))
            .unwrap()
            .unwrap();
        assert_eq!(doc.children(doc.root()), &[new_root, Id(6)]);
        assert!(!doc.contains_node(Id(1)));
        assert!(!doc.contains_node(Id(3)));
        assert!(new_root.0 > 7, "fresh ids are never reused");
    }

    fn form() -> Document {
        Document::from_node(Node::document(vec![Node::element("form").with_children([
            Node::element("a"),
            Node::element("b"),
            Node::element("c"),
        ])]))
    }

    fn child_names(doc: &Document, id: Id) -> Vec<&str> {
        doc.children(id)
            .iter()
            .filter_map(|c| doc.tag_name(*c))
            .collect()
    }

    #[test]
    fn replace_subtree_with_empty_fragment_removes_target() {
        let mut doc = form();
        assert_eq!(doc.replace_subtree(Id(3), Node::document(vec![])), Ok(None));
        assert_eq!(child_names(&doc, Id(1)), ["a", "c"]);
        assert!(!doc.contains_node(Id(3)));
        assert_eq!(doc.descendants(doc.root()).count(), 3);
        assert!(!doc.children(Id(1)).contains(&Id(1)));
        assert_eq!(doc.parent(Id(1)), Some(Id::DOCUMENT));
    }

    #[test]
    fn replace_subtree_splices_every_fragment_root_in_order() {
        let mut doc = form();
        let first = doc
            .replace_subtree(
                Id(3),
                Node::document(vec![Node::element("x"), Node::element("y")]),
            )
            .unwrap();
        assert_eq!(child_names(&doc, Id(1)), ["a", "x", "y", "c"]);
        assert_eq!(first, Some(doc.children(Id(1))[1]));
    }

    #[test]
    fn append_empty_fragment_adds_nothing() {
        let mut doc = form();
        assert_eq!(doc.append(Id(1), Node::document(vec![])), Ok(None));
        assert_eq!(child_names(&doc, Id(1)), ["a", "b", "c"]);
    }

    #[test]
    fn repeated_reloads_reuse_arena_slots() {
        let mut doc = form();
        let render = || {
            Node::element("form").with_children([
                Node::element("a").with_child(Node::text("one")),
                Node::element("b").with_child(Node::text("two")),
            ])
        };
        let mut current = Id(1);
        let mut last_id = current;
        for _ in 0..3 {
            current = doc.replace_subtree(current, render()).unwrap().unwrap();
        }
        let slots = doc.nodes.len();
        for _ in 0..20 {
            current = doc.replace_subtree(current, render()).unwrap().unwrap();
            assert!(current.0 > last_id.0, "ids stay monotonic");
            last_id = current;
        }
        assert_eq!(doc.nodes.len(), slots);
        assert_eq!(doc.nodes.iter().filter(|n| n.is_some()).count(), 6);
        assert_eq!(child_names(&doc, current), ["a", "b"]);
    }

    #[test]
    fn replacing_the_document_fails() {
        let mut doc = sample();
        assert_eq!(
            doc.replace_subtree(Id::DOCUMENT, Node::element("div")),
            Err(DomError::Detached(Id::DOCUMENT))
        );
        assert_eq!(doc.remove(Id(99)), Err(DomError::UnknownNode(Id(99))));
    }

    #[test]
    fn contains_is_inclusive() {
        let doc = sample();
        assert!(doc.contains(Id(1), Id(1)));
        assert!(doc.contains(Id(1), Id(3)));
        assert!(!doc.contains(Id(2), Id(4)));
    }

    #[test]
    fn hidden_propagates_from_ancestors() {
        let mut doc = sample();
        assert!(!doc.is_hidden(Id(2)));
        doc.set_display(Id(1), Display::None).unwrap();
        assert!(doc.is_hidden(Id(2)));
        doc.set_display(Id(1), Display::Initial).unwrap();
        assert!(!doc.is_hidden(Id(2)));
    }
}
