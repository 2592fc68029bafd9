use std::sync::Arc;

pub type NodeId = u32;

/// Identifier of a live node inside a [`Document`](crate::Document).
///
/// Ids are handed out in document order when markup is loaded and are never
/// reused, so an id of a removed node stays dead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub NodeId);

impl Id {
    pub const DOCUMENT: Id = Id(0);
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// `(name, value)`; a `None` value is a boolean attribute (`<input checked>`).
pub type Attribute = (Arc<str>, Option<String>);

/// Owned markup description, loaded into a document with
/// [`Document::from_node`](crate::Document::from_node).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Document {
        doctype: Option<String>,
        children: Vec<Node>,
    },
    Element {
        name: Arc<str>,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl Node {
    pub fn document(children: Vec<Node>) -> Self {
        Node::Document {
            doctype: Some("html".to_string()),
            children,
        }
    }

    pub fn element(name: &str) -> Self {
        Node::Element {
            name: Arc::from(name),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Node::Comment { text: text.into() }
    }

    /// Adds `name="value"`; later duplicates of the same name overwrite.
    pub fn with_attr(self, name: &str, value: impl Into<String>) -> Self {
        self.push_attr(name, Some(value.into()))
    }

    /// Adds a boolean attribute such as `checked` or `data-multiselect-dropdown`.
    pub fn with_flag(self, name: &str) -> Self {
        self.push_attr(name, None)
    }

    pub fn with_child(mut self, child: Node) -> Self {
        if let Some(children) = self.children_mut() {
            children.push(child);
        } else {
            debug_assert!(false, "text and comment nodes cannot have children");
        }
        self
    }

    pub fn with_children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        if let Some(children) = self.children_mut() {
            children.extend(nodes);
        } else {
            debug_assert!(false, "text and comment nodes cannot have children");
        }
        self
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => children,
            Node::Text { .. } | Node::Comment { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children, .. } => Some(children),
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    fn push_attr(mut self, name: &str, value: Option<String>) -> Self {
        match &mut self {
            Node::Element { attributes, .. } => {
                if let Some(slot) = attributes
                    .iter_mut()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                {
                    slot.1 = value;
                } else {
                    attributes.push((Arc::from(name), value));
                }
            }
            _ => debug_assert!(false, "only elements carry attributes"),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overwrites_duplicate_attributes() {
        let node = Node::element("input")
            .with_attr("type", "text")
            .with_attr("TYPE", "checkbox")
            .with_flag("checked");

        let Node::Element { attributes, .. } = node else {
            panic!("expected element");
        };
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].1.as_deref(), Some("checkbox"));
        assert_eq!(attributes[1].1, None);
    }

    #[test]
    fn text_nodes_have_no_children() {
        assert!(Node::text("x").children().is_empty());
        assert!(Node::text("x").children_mut().is_none());
    }
}
