//! Event wiring between host interactions and the [`Controller`].
//!
//! The host translates its raw input into [`Interaction`]s and feeds them to
//! [`Behaviors::dispatch`]. After anything that may have touched the
//! document it calls [`Behaviors::pump`] so dialog close notifications reach
//! the controller. Freshly rendered markup, the initial page included, goes
//! through [`Behaviors::attach`].

use dom::{Document, DomEvent, FocusOptions, Id, SelectorList};
use std::collections::HashSet;

use crate::controller::Controller;
use crate::error::DropdownError;

const LOG_TARGET: &str = "multiselect.behaviors";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    ToggleClick { instance: Id },
    DialogCloseClick { instance: Id },
    /// Escape pressed anywhere in the window.
    EscapeKey,
    /// A click anywhere in the window, after element handlers ran.
    WindowClick { target: Id },
    ClearClick { instance: Id },
    ClearEnter { instance: Id, shift: bool },
    SelectAll { instance: Id },
    SelectNone { instance: Id },
    SearchInput { instance: Id },
    CheckboxChange { instance: Id },
    CheckboxEnter { checkbox: Id, shift: bool },
    SubmitEnter { instance: Id, shift: bool },
}

#[derive(Debug, Default)]
pub struct Behaviors {
    attached: HashSet<Id>,
}

impl Behaviors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes every dropdown in `context` that has not been seen yet,
    /// then applies a pending focus request.
    ///
    /// Dropdowns the controller remembers as persisted come back open with
    /// their search text restored. They take default dialog focus only when
    /// a focus request is pending.
    pub fn attach(
        &mut self,
        ctrl: &mut Controller,
        doc: &mut Document,
        context: Id,
    ) -> Result<(), DropdownError> {
        self.attached.retain(|id| doc.contains_node(*id));

        for instance in ctrl.instances(doc, context) {
            if !self.attached.insert(instance) {
                continue;
            }
            log::trace!(
                target: LOG_TARGET,
                "attach {instance} ({:?})",
                ctrl.id_of(doc, instance)
            );

            if !ctrl.checkboxes(doc, instance).is_empty() {
                ctrl.update_label(doc, instance)?;
            }

            if ctrl.is_persisted_on_load(doc, instance) {
                if let Some(search) = ctrl.search_input(doc, instance) {
                    let text = ctrl.search_text(doc, instance).to_string();
                    doc.set_value(search, &text)?;
                    ctrl.filter(doc, instance)?;
                }
                let user_triggered = ctrl.is_focus_pending();
                ctrl.open(doc, instance, user_triggered)?;
            }
        }

        self.apply_pending_focus(ctrl, doc)
    }

    fn apply_pending_focus(
        &self,
        ctrl: &mut Controller,
        doc: &mut Document,
    ) -> Result<(), DropdownError> {
        let Some(selector) = ctrl.pending_focus() else {
            return Ok(());
        };
        let selector = SelectorList::parse(selector);
        ctrl.clear_focus();
        let selector = selector?;

        let Some(target) = doc.query_selector(doc.root(), &selector) else {
            log::debug!(target: LOG_TARGET, "nothing to focus after reload");
            return Ok(());
        };
        doc.set_attr(target, "tabindex", "0")?;
        let focused = doc.focus(target, FocusOptions::PREVENT_SCROLL);
        log::debug!(target: LOG_TARGET, "focus {target} after reload: {focused}");
        Ok(())
    }

    pub fn dispatch(
        &mut self,
        ctrl: &mut Controller,
        doc: &mut Document,
        interaction: Interaction,
    ) -> Result<(), DropdownError> {
        log::trace!(target: LOG_TARGET, "{interaction:?}");
        match interaction {
            Interaction::ToggleClick { instance } => ctrl.toggle(doc, instance, true),
            Interaction::DialogCloseClick { instance } => ctrl.close(doc, instance),
            Interaction::EscapeKey => {
                for instance in ctrl.instances(doc, doc.root()) {
                    ctrl.close(doc, instance)?;
                }
                Ok(())
            }
            Interaction::WindowClick { target } => {
                let clicked = ctrl.instance_of(doc, target);
                for instance in ctrl.instances(doc, doc.root()) {
                    if Some(instance) != clicked {
                        ctrl.close(doc, instance)?;
                    }
                }
                Ok(())
            }
            Interaction::ClearClick { instance } => {
                uncheck_all(ctrl, doc, instance)?;
                ctrl.submit(doc, instance)
            }
            Interaction::ClearEnter { instance, shift } => {
                uncheck_all(ctrl, doc, instance)?;
                let clear = ctrl.clear_button(doc, instance);
                submit_for_reload(ctrl, doc, instance, clear, shift)
            }
            Interaction::SelectAll { instance } => {
                for checkbox in ctrl.unchecked_checkboxes(doc, instance) {
                    doc.set_checked(checkbox, true)?;
                }
                ctrl.update_label(doc, instance)
            }
            Interaction::SelectNone { instance } => {
                uncheck_all(ctrl, doc, instance)?;
                ctrl.update_label(doc, instance)
            }
            Interaction::SearchInput { instance } => ctrl.filter(doc, instance),
            Interaction::CheckboxChange { instance } => ctrl.update_label(doc, instance),
            Interaction::CheckboxEnter { checkbox, shift } => {
                let Some(instance) = ctrl.instance_of(doc, checkbox) else {
                    return Ok(());
                };
                submit_for_reload(ctrl, doc, instance, Some(checkbox), shift)
            }
            Interaction::SubmitEnter { instance, shift } => {
                let submit = ctrl.submit_button(doc, instance);
                submit_for_reload(ctrl, doc, instance, submit, shift)
            }
        }
    }

    /// Drains document events. Dialog close notifications for dropdown
    /// dialogs and checkbox changes inside dropdowns are handled here; every
    /// other event is handed back in order.
    pub fn pump(
        &mut self,
        ctrl: &mut Controller,
        doc: &mut Document,
    ) -> Result<Vec<DomEvent>, DropdownError> {
        let mut unhandled = Vec::new();
        // Handling can raise further events.
        while doc.has_pending_events() {
            for event in doc.take_events() {
                match event {
                    DomEvent::DialogClosed { dialog } => {
                        let owned = ctrl
                            .instance_of(doc, dialog)
                            .is_some_and(|instance| ctrl.dialog(doc, instance) == Some(dialog));
                        if !ctrl.handle_dialog_closed(doc, dialog)? && !owned {
                            unhandled.push(event);
                        }
                    }
                    DomEvent::Change { target } => match ctrl.instance_of(doc, target) {
                        Some(instance) => ctrl.update_label(doc, instance)?,
                        None => unhandled.push(event),
                    },
                    DomEvent::FormSubmitted { .. } => unhandled.push(event),
                }
            }
        }
        Ok(unhandled)
    }
}

fn uncheck_all(ctrl: &Controller, doc: &mut Document, instance: Id) -> Result<(), DropdownError> {
    for checkbox in ctrl.checked_checkboxes(doc, instance) {
        doc.set_checked(checkbox, false)?;
    }
    Ok(())
}

/// Keyboard submission from inside a dropdown. Without Shift the dropdown
/// comes back open and `focus_target` regains focus after the reload; with
/// Shift it stays closed and focus goes to the results.
fn submit_for_reload(
    ctrl: &mut Controller,
    doc: &mut Document,
    instance: Id,
    focus_target: Option<Id>,
    shift: bool,
) -> Result<(), DropdownError> {
    if shift {
        ctrl.do_not_persist_on_load(doc, instance);
        ctrl.set_focus(doc, None);
    } else {
        ctrl.persist_on_load(doc, instance);
        ctrl.set_focus(doc, focus_target);
    }
    ctrl.submit(doc, instance)
}
