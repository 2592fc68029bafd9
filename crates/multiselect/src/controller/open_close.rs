use dom::{Document, FocusOptions, Id};

use super::{Controller, LOG_TARGET};
use crate::config::Breakpoint;
use crate::error::DropdownError;

const ARIA_EXPANDED: &str = "aria-expanded";

/// How an opening dialog is presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presentation {
    /// Blocks the rest of the page.
    Modal,
    /// Non-modal, focus moves into the dialog.
    NonModal,
    /// Non-modal and focus stays where it is. Used for programmatic opens so
    /// a reload does not pull focus away from what the user just touched.
    NonModalWithoutFocus,
}

impl Presentation {
    pub fn resolve(viewport_width: u32, breakpoint: Breakpoint, user_triggered: bool) -> Self {
        if breakpoint.is_modal_at(viewport_width) {
            Presentation::Modal
        } else if user_triggered {
            Presentation::NonModal
        } else {
            Presentation::NonModalWithoutFocus
        }
    }
}

impl Controller {
    /// Opens the dropdown's dialog.
    ///
    /// Fails with [`DropdownError::MissingDialog`] before touching any state
    /// when the dropdown has no dialog.
    pub fn open(
        &mut self,
        doc: &mut Document,
        instance: Id,
        user_triggered: bool,
    ) -> Result<(), DropdownError> {
        let dialog = self.require_dialog(doc, instance)?;
        let presentation =
            Presentation::resolve(doc.viewport_width(), self.breakpoint(doc, instance), user_triggered);

        match presentation {
            Presentation::Modal => doc.show_modal(dialog)?,
            Presentation::NonModal => doc.show(dialog)?,
            Presentation::NonModalWithoutFocus => doc.set_dialog_open(dialog, true)?,
        }
        doc.set_attr(instance, &self.markers.open_attr, "")?;
        if let Some(toggle) = self.toggle_button(doc, instance) {
            doc.set_attr(toggle, ARIA_EXPANDED, "true")?;
        }

        // Subscriptions for dialogs dropped by a reload can never fire.
        self.close_subscriptions
            .retain(|dialog, _| doc.contains_node(*dialog));
        self.close_subscriptions.insert(dialog, instance);

        let id = self.key(doc, instance);
        log::debug!(target: LOG_TARGET, "open {id:?} as {presentation:?}");
        self.opened.insert(id);

        if self.should_open_on_load(doc, instance) {
            self.persist_on_load(doc, instance);
        }
        Ok(())
    }

    /// Closes the dropdown's dialog and cancels reopening after reload.
    ///
    /// Focus resting in the item list moves back to the toggle.
    pub fn close(&mut self, doc: &mut Document, instance: Id) -> Result<(), DropdownError> {
        let dialog = self.require_dialog(doc, instance)?;
        let toggle = self.toggle_button(doc, instance);
        let focus_in_list = self
            .list(doc, instance)
            .is_some_and(|list| doc.focus_within(list));

        // Our own close must not come back through the subscription.
        self.close_subscriptions.remove(&dialog);
        doc.close_dialog(dialog)?;
        doc.remove_attr(instance, &self.markers.open_attr)?;
        if let Some(toggle) = toggle {
            doc.set_attr(toggle, ARIA_EXPANDED, "false")?;
            if focus_in_list {
                doc.focus(toggle, FocusOptions::PREVENT_SCROLL);
            }
        }

        let id = self.id_of(doc, instance);
        if self.opened.remove(id) {
            log::debug!(target: LOG_TARGET, "close {id:?}");
        }
        self.do_not_persist_on_load(doc, instance);
        Ok(())
    }

    pub fn toggle(
        &mut self,
        doc: &mut Document,
        instance: Id,
        user_triggered: bool,
    ) -> Result<(), DropdownError> {
        if self.is_open(doc, instance) {
            self.close(doc, instance)
        } else {
            self.open(doc, instance, user_triggered)
        }
    }

    /// Reacts to a dialog reporting itself closed. Returns `true` if the
    /// dialog belonged to an open dropdown, which is now closed too.
    pub fn handle_dialog_closed(
        &mut self,
        doc: &mut Document,
        dialog: Id,
    ) -> Result<bool, DropdownError> {
        let Some(instance) = self.close_subscriptions.remove(&dialog) else {
            return Ok(false);
        };
        if !doc.contains_node(instance) {
            return Ok(false);
        }
        log::trace!(target: LOG_TARGET, "dialog {dialog} closed itself");
        self.close(doc, instance)?;
        Ok(true)
    }

    fn require_dialog(&self, doc: &Document, instance: Id) -> Result<Id, DropdownError> {
        self.dialog(doc, instance)
            .ok_or_else(|| DropdownError::MissingDialog {
                id: self.id_of(doc, instance).to_string(),
                marker: format!("{}-dialog", self.config.attribute),
            })
    }
}
