use dom::{Display, Document, Id};

use super::{Controller, LOG_TARGET};
use crate::config::{LabelTemplates, parse_threshold};
use crate::error::DropdownError;
use crate::filter::item_matches;
use crate::label::render_label;

impl Controller {
    /// Rewrites the toggle text from the checked count.
    pub fn update_label(&self, doc: &mut Document, instance: Id) -> Result<(), DropdownError> {
        let Some(toggle) = self.toggle_button(doc, instance) else {
            return Ok(());
        };
        let boxes = self.checkboxes(doc, instance);
        let checked = boxes.iter().filter(|c| doc.is_checked(**c)).count();
        let templates = LabelTemplates::read(doc, &self.markers, instance);
        let label = render_label(&templates, checked, boxes.len());
        doc.set_text_content(toggle, &label)?;
        Ok(())
    }

    /// Shows the list items whose label matches the search input and hides
    /// the rest. The typed text is remembered for reloads.
    pub fn filter(&mut self, doc: &mut Document, instance: Id) -> Result<(), DropdownError> {
        let Some(search) = self.search_input(doc, instance) else {
            return Ok(());
        };
        let query = doc.value(search).unwrap_or_default().to_string();
        let threshold = parse_threshold(doc.attr(search, &self.markers.search_threshold_attr));
        self.set_search(doc, instance, &query);

        let mut shown = 0usize;
        let items = self.list_items(doc, instance);
        for &item in &items {
            let text = match doc.query_selector(item, &self.markers.label) {
                Some(label) => doc.inner_text(label),
                None => doc.inner_text(item),
            };
            let display = if item_matches(&text, &query, threshold) {
                shown += 1;
                Display::Initial
            } else {
                Display::None
            };
            doc.set_display(item, display)?;
        }
        log::trace!(
            target: LOG_TARGET,
            "filter {:?} by {query:?}: {shown}/{} shown",
            self.id_of(doc, instance),
            items.len()
        );
        Ok(())
    }

    /// Submits the enclosing form through its submit control, or directly
    /// when it has none. Every dropdown counts as closed afterwards.
    pub fn submit(&mut self, doc: &mut Document, instance: Id) -> Result<(), DropdownError> {
        self.opened.clear();
        let Some(form) = doc.closest(instance, &self.markers.form) else {
            log::debug!(
                target: LOG_TARGET,
                "submit {:?}: not inside a form",
                self.id_of(doc, instance)
            );
            return Ok(());
        };
        match doc.query_selector(form, &self.markers.form_submit) {
            Some(button) => doc.click(button)?,
            None => doc.request_submit(form)?,
        }
        Ok(())
    }
}
