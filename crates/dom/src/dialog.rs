//! `<dialog>` surface behaviour.
//!
//! Opening mirrors the `open` attribute. Closing an open dialog, by script or
//! by the surface itself, queues exactly one [`DomEvent::DialogClosed`].

use crate::document::Document;
use crate::events::DomEvent;
use crate::focus::FocusOptions;
use crate::types::Id;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DialogMode {
    #[default]
    Closed,
    NonModal,
    /// Blocks interaction with the rest of the page until closed.
    Modal,
}

impl DialogMode {
    pub fn is_open(self) -> bool {
        !matches!(self, DialogMode::Closed)
    }
}

impl Document {
    pub fn is_dialog(&self, id: Id) -> bool {
        self.tag_name(id)
            .is_some_and(|name| name.eq_ignore_ascii_case("dialog"))
    }

    pub fn dialog_mode(&self, id: Id) -> Option<DialogMode> {
        if !self.is_dialog(id) {
            return None;
        }
        self.element(id).ok().map(|e| e.dialog)
    }

    /// Opens non-modally and runs the dialog focusing steps.
    pub fn show(&mut self, dialog: Id) -> Result<(), crate::DomError> {
        if self.open_dialog(dialog, DialogMode::NonModal)? {
            self.run_dialog_focusing_steps(dialog);
        }
        Ok(())
    }

    /// Opens modally and runs the dialog focusing steps.
    pub fn show_modal(&mut self, dialog: Id) -> Result<(), crate::DomError> {
        if self.open_dialog(dialog, DialogMode::Modal)? {
            self.run_dialog_focusing_steps(dialog);
        }
        Ok(())
    }

    /// Sets the `open` state directly. Opening this way is non-modal and does
    /// not move focus; closing behaves like [`Document::close_dialog`].
    pub fn set_dialog_open(&mut self, dialog: Id, open: bool) -> Result<(), crate::DomError> {
        if open {
            self.open_dialog(dialog, DialogMode::NonModal)?;
        } else {
            self.close_dialog(dialog)?;
        }
        Ok(())
    }

    /// Closes an open dialog. Returns `false` if it was already closed, in
    /// which case no event is raised.
    pub fn close_dialog(&mut self, dialog: Id) -> Result<bool, crate::DomError> {
        self.ensure_dialog(dialog)?;
        let el = self.element_mut(dialog)?;
        if !el.dialog.is_open() {
            return Ok(false);
        }
        el.dialog = DialogMode::Closed;
        el.remove_attr("open");
        if self.focus_within(dialog) {
            self.blur();
        }
        log::trace!(target: "dom.dialog", "close {dialog}");
        self.push_event(DomEvent::DialogClosed { dialog });
        Ok(true)
    }

    /// The surface closing itself (Escape on a modal, a `method=dialog` form).
    /// Only modal dialogs handle Escape natively.
    pub fn dismiss_dialog(&mut self, dialog: Id) -> Result<bool, crate::DomError> {
        match self.dialog_mode(dialog) {
            Some(DialogMode::Modal) => self.close_dialog(dialog),
            Some(_) => Ok(false),
            None => Err(self.not_a_dialog(dialog)),
        }
    }

    /// The topmost open modal dialog, if any.
    pub fn modal_dialog(&self) -> Option<Id> {
        self.descendants(self.root())
            .filter(|d| self.dialog_mode(*d) == Some(DialogMode::Modal))
            .last()
    }

    fn open_dialog(&mut self, dialog: Id, mode: DialogMode) -> Result<bool, crate::DomError> {
        self.ensure_dialog(dialog)?;
        let el = self.element_mut(dialog)?;
        if el.dialog.is_open() {
            log::trace!(
                target: "dom.dialog",
                "open {dialog} as {mode:?} ignored: already {:?}",
                el.dialog
            );
            return Ok(false);
        }
        el.dialog = mode;
        el.set_attr("open", None);
        log::trace!(target: "dom.dialog", "open {dialog} as {mode:?}");
        Ok(true)
    }

    fn run_dialog_focusing_steps(&mut self, dialog: Id) {
        let candidates: Vec<Id> = self
            .descendants(dialog)
            .filter(|d| self.is_focusable(*d) && !self.is_hidden(*d))
            .collect();
        let target = candidates
            .iter()
            .copied()
            .find(|d| self.has_attr(*d, "autofocus"))
            .or_else(|| candidates.first().copied());
        if let Some(target) = target {
            self.focus(target, FocusOptions::default());
        }
    }

    fn ensure_dialog(&self, id: Id) -> Result<(), crate::DomError> {
        if self.is_dialog(id) {
            Ok(())
        } else {
            Err(self.not_a_dialog(id))
        }
    }

    fn not_a_dialog(&self, id: Id) -> crate::DomError {
        if self.contains_node(id) {
            crate::DomError::NotADialog(id)
        } else {
            crate::DomError::UnknownNode(id)
        }
    }
}
