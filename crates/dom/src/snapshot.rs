use crate::dialog::DialogMode;
use crate::document::{Display, Document};
use crate::forms::InputControlType;
use crate::types::Id;
use std::fmt::{self, Write};

/// Deterministic serialization of a live subtree for test comparisons.
/// Not a stable format.
///
/// Each line is one node, indented two spaces per level. Elements list their
/// attributes in source order followed by live state in braces:
/// `{checked}`, `{value="..."}`, `{display=none}`, `{dialog=modal}`,
/// `{focused}`. Text nodes are quoted; whitespace-only text is skipped.
#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(doc: &Document, root: Id) -> Self {
        let mut lines = Vec::new();
        walk(doc, root, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

fn walk(doc: &Document, id: Id, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    if id == doc.root() {
        out.push(format!("{indent}#document"));
    } else if let Some(name) = doc.tag_name(id) {
        let mut line = format!("{indent}<{name}");
        for (k, v) in doc.attributes(id) {
            match v {
                Some(v) => {
                    let _ = write!(line, " {k}=\"{}\"", escape(v));
                }
                None => {
                    let _ = write!(line, " {k}");
                }
            }
        }
        line.push('>');
        push_state(doc, id, &mut line);
        out.push(line);
    } else if doc.is_comment(id) {
        out.push(format!("{indent}<!-- {} -->", doc.text(id).unwrap_or("")));
        return;
    } else if let Some(text) = doc.text(id) {
        if !text.trim().is_empty() {
            out.push(format!("{indent}\"{}\"", escape(text)));
        }
        return;
    }
    for child in doc.children(id) {
        walk(doc, *child, depth + 1, out);
    }
}

fn push_state(doc: &Document, id: Id, line: &mut String) {
    match doc.input_control_type(id) {
        InputControlType::Checkbox | InputControlType::Radio if doc.is_checked(id) => {
            line.push_str(" {checked}");
        }
        InputControlType::Text | InputControlType::Search => {
            if let Some(value) = doc.value(id).filter(|v| !v.is_empty()) {
                let _ = write!(line, " {{value=\"{}\"}}", escape(value));
            }
        }
        _ => {}
    }
    match doc.display(id) {
        Display::Unset => {}
        Display::None => line.push_str(" {display=none}"),
        Display::Initial => line.push_str(" {display=initial}"),
    }
    match doc.dialog_mode(id) {
        Some(DialogMode::NonModal) => line.push_str(" {dialog=open}"),
        Some(DialogMode::Modal) => line.push_str(" {dialog=modal}"),
        _ => {}
    }
    if doc.active_element() == Some(id) {
        line.push_str(" {focused}");
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FocusOptions, Node};

    #[test]
    fn renders_attributes_and_live_state() {
        let mut doc = Document::from_node(Node::document(vec![
            Node::element("ul").with_child(
                Node::element("li").with_children([
                    Node::element("input")
                        .with_attr("type", "checkbox")
                        .with_flag("checked"),
                    Node::element("label").with_child(Node::text("Red \"R\"")),
                ]),
            ),
            Node::comment("end"),
        ]));
        doc.set_display(Id(2), Display::None).unwrap();
        // hidden controls refuse focus
        assert!(!doc.focus(Id(3), FocusOptions::PREVENT_SCROLL));

        let snapshot = DomSnapshot::new(&doc, doc.root());
        assert_eq!(
            snapshot.as_lines(),
            &[
                "#document",
                "  <ul>",
                "    <li> {display=none}",
                "      <input type=\"checkbox\" checked> {checked}",
                "      <label>",
                "        \"Red \\\"R\\\"\"",
                "  <!-- end -->",
            ]
        );
        assert_eq!(snapshot.to_string(), snapshot.render());
    }
}
