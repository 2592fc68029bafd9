use crate::document::{Document, DomError};
use crate::events::DomEvent;
use crate::types::Id;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputControlType {
    Text,
    Search,
    Checkbox,
    Radio,
    Submit,
    Button,
    Other,
}

impl Document {
    pub fn input_control_type(&self, id: Id) -> InputControlType {
        let Ok(el) = self.element(id) else {
            return InputControlType::Other;
        };
        let ty = el.attr("type").map(str::trim).filter(|s| !s.is_empty());

        if el.name.eq_ignore_ascii_case("button") {
            return match ty {
                // missing type on <button> defaults to submit
                None => InputControlType::Submit,
                Some(t) if t.eq_ignore_ascii_case("submit") => InputControlType::Submit,
                Some(_) => InputControlType::Button,
            };
        }
        if !el.name.eq_ignore_ascii_case("input") {
            return InputControlType::Other;
        }
        match ty {
            None => InputControlType::Text, // missing type defaults to text
            Some(t) if t.eq_ignore_ascii_case("text") => InputControlType::Text,
            Some(t) if t.eq_ignore_ascii_case("search") => InputControlType::Search,
            Some(t) if t.eq_ignore_ascii_case("checkbox") => InputControlType::Checkbox,
            Some(t) if t.eq_ignore_ascii_case("radio") => InputControlType::Radio,
            Some(t) if t.eq_ignore_ascii_case("submit") => InputControlType::Submit,
            Some(t) if t.eq_ignore_ascii_case("button") => InputControlType::Button,
            _ => InputControlType::Other,
        }
    }

    pub fn is_checked(&self, id: Id) -> bool {
        self.element(id).is_ok_and(|e| e.checked)
    }

    /// Sets the live checked state without raising `change`, like assigning
    /// `checkbox.checked` from script. Returns `true` if the state changed.
    pub fn set_checked(&mut self, id: Id, checked: bool) -> Result<bool, DomError> {
        let el = self.element_mut(id)?;
        let changed = el.checked != checked;
        el.checked = checked;
        Ok(changed)
    }

    /// Live value of a text-like control.
    pub fn value(&self, id: Id) -> Option<&str> {
        self.element(id).ok().map(|e| e.value.as_str())
    }

    pub fn set_value(&mut self, id: Id, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        el.value.clear();
        el.value.push_str(value);
        Ok(())
    }

    /// Nearest `<form>` ancestor (inclusive).
    pub fn enclosing_form(&self, id: Id) -> Option<Id> {
        self.ancestors(id).find(|a| {
            self.tag_name(*a)
                .is_some_and(|name| name.eq_ignore_ascii_case("form"))
        })
    }

    /// User activation of an element.
    ///
    /// Checkboxes toggle and raise `change`; submit controls inside a form
    /// raise a submission with themselves as the submitter. Disabled controls
    /// ignore the click.
    pub fn click(&mut self, id: Id) -> Result<(), DomError> {
        self.element(id)?;
        if self.has_attr(id, "disabled") {
            return Ok(());
        }
        match self.input_control_type(id) {
            InputControlType::Checkbox => {
                let checked = self.is_checked(id);
                self.set_checked(id, !checked)?;
                self.push_event(DomEvent::Change { target: id });
            }
            InputControlType::Submit => {
                if let Some(form) = self.enclosing_form(id) {
                    self.push_event(DomEvent::FormSubmitted {
                        form,
                        submitter: Some(id),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Submits `form` without a submitter, like `form.requestSubmit()`.
    pub fn request_submit(&mut self, form: Id) -> Result<(), DomError> {
        match self.tag_name(form) {
            Some(name) if name.eq_ignore_ascii_case("form") => {
                self.push_event(DomEvent::FormSubmitted {
                    form,
                    submitter: None,
                });
                Ok(())
            }
            Some(_) => Err(DomError::NotAForm(form)),
            None if self.contains_node(form) => Err(DomError::NotAnElement(form)),
            None => Err(DomError::UnknownNode(form)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;

    fn doc() -> Document {
        Document::from_node(Node::document(vec![
            Node::element("form").with_children([
                Node::element("input")
                    .with_attr("type", "checkbox")
                    .with_flag("checked"),
                Node::element("input").with_attr("type", "checkbox"),
                Node::element("input")
                    .with_attr("type", "search")
                    .with_attr("value", "red"),
                Node::element("button").with_attr("type", "button"),
                Node::element("input").with_attr("type", "submit"),
                Node::element("button"),
            ]),
            Node::element("button"),
        ]))
    }

    #[test]
    fn seeds_control_state_from_markup() {
        let doc = doc();
        assert!(doc.is_checked(Id(2)));
        assert!(!doc.is_checked(Id(3)));
        assert_eq!(doc.value(Id(4)), Some("red"));
    }

    #[test]
    fn classifies_controls() {
        let doc = doc();
        assert_eq!(doc.input_control_type(Id(2)), InputControlType::Checkbox);
        assert_eq!(doc.input_control_type(Id(4)), InputControlType::Search);
        assert_eq!(doc.input_control_type(Id(5)), InputControlType::Button);
        assert_eq!(doc.input_control_type(Id(6)), InputControlType::Submit);
        assert_eq!(doc.input_control_type(Id(7)), InputControlType::Submit);
        assert_eq!(doc.input_control_type(Id(1)), InputControlType::Other);
    }

    #[test]
    fn set_checked_is_silent() {
        let mut doc = doc();
        assert!(doc.set_checked(Id(3), true).unwrap());
        assert!(!doc.set_checked(Id(3), true).unwrap());
        assert!(doc.take_events().is_empty());
    }

    #[test]
    fn clicking_a_checkbox_toggles_and_notifies() {
        let mut doc = doc();
        doc.click(Id(2)).unwrap();
        assert!(!doc.is_checked(Id(2)));
        assert_eq!(doc.take_events(), vec![DomEvent::Change { target: Id(2) }]);
    }

    #[test]
    fn clicking_submit_submits_the_owning_form() {
        let mut doc = doc();
        doc.click(Id(5)).unwrap();
        doc.click(Id(6)).unwrap();
        doc.click(Id(8)).unwrap();
        assert_eq!(
            doc.take_events(),
            vec![DomEvent::FormSubmitted {
                form: Id(1),
                submitter: Some(Id(6))
            }]
        );
    }

    #[test]
    fn request_submit_requires_a_form() {
        let mut doc = doc();
        doc.request_submit(Id(1)).unwrap();
        assert_eq!(
            doc.take_events(),
            vec![DomEvent::FormSubmitted {
                form: Id(1),
                submitter: None
            }]
        );
        assert_eq!(doc.request_submit(Id(8)), Err(DomError::NotAForm(Id(8))));
        assert_eq!(doc.enclosing_form(Id(4)), Some(Id(1)));
        assert_eq!(doc.enclosing_form(Id(8)), None);
    }
}
