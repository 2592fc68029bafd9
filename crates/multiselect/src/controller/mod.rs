//! The dropdown controller.
//!
//! One `Controller` serves every dropdown on a page. It never owns the
//! dropdown markup; each call indexes into the host [`Document`] by marker
//! attributes and keys its own bookkeeping on the dropdown's stable id, so
//! state survives the markup being re-rendered after a partial reload.

mod open_close;
mod view;

pub use open_close::Presentation;

use dom::{Document, Id, quote_selector_value};
use std::collections::{BTreeSet, HashMap};

use crate::attrs::Markers;
use crate::config::{Breakpoint, ControllerConfig, DropdownConfig};

const LOG_TARGET: &str = "multiselect.controller";

#[derive(Debug)]
pub struct Controller {
    config: ControllerConfig,
    markers: Markers,

    opened: BTreeSet<String>,
    persisted_on_load: BTreeSet<String>,
    /// Selector to focus after the next reload; `None` means the results
    /// region. Only meaningful while `should_focus` is set.
    focus: Option<String>,
    should_focus: bool,
    search: HashMap<String, String>,
    /// One-shot close reactions: dialog -> owning dropdown.
    close_subscriptions: HashMap<Id, Id>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        let markers = Markers::new(&config.attribute);
        Self {
            config,
            markers,
            opened: BTreeSet::new(),
            persisted_on_load: BTreeSet::new(),
            focus: None,
            should_focus: false,
            search: HashMap::new(),
            close_subscriptions: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Discovery & addressing
    // ---------------------------------------------------------------------

    pub fn is_multiselect(&self, doc: &Document, element: Id) -> bool {
        doc.matches(element, &self.markers.root)
    }

    /// Dropdowns in `root`, the root first if it is one, then descendants in
    /// document order.
    pub fn instances(&self, doc: &Document, root: Id) -> Vec<Id> {
        let mut out = Vec::new();
        if self.is_multiselect(doc, root) {
            out.push(root);
        }
        out.extend(doc.query_selector_all(root, &self.markers.root));
        out
    }

    /// The dropdown enclosing `element` (inclusive).
    pub fn instance_of(&self, doc: &Document, element: Id) -> Option<Id> {
        doc.closest(element, &self.markers.root)
    }

    /// Stable id of an element, empty when the id attribute is missing.
    pub fn id_of<'d>(&self, doc: &'d Document, element: Id) -> &'d str {
        doc.attr(element, &self.config.id_attribute)
            .unwrap_or_default()
    }

    /// Selector that finds `element` again after it has been re-rendered.
    pub fn selector_of(&self, doc: &Document, element: Id) -> String {
        format!(
            "[{}={}]",
            self.config.id_attribute,
            quote_selector_value(self.id_of(doc, element))
        )
    }

    pub fn dropdown_config(&self, doc: &Document, instance: Id) -> DropdownConfig {
        DropdownConfig::read(doc, &self.markers, &self.config.id_attribute, instance)
    }

    pub fn breakpoint(&self, doc: &Document, instance: Id) -> Breakpoint {
        Breakpoint::parse(doc.attr(instance, &self.markers.breakpoint_attr))
    }

    // ---------------------------------------------------------------------
    // Sub-elements
    // ---------------------------------------------------------------------

    pub fn toggle_button(&self, doc: &Document, instance: Id) -> Option<Id> {
        doc.query_selector(instance, &self.markers.toggle)
    }

    pub fn dialog(&self, doc: &Document, instance: Id) -> Option<Id> {
        doc.query_selector(instance, &self.markers.dialog)
    }

    pub fn dialog_close_button(&self, doc: &Document, instance: Id) -> Option<Id> {
        doc.query_selector(instance, &self.markers.dialog_close)
    }

    pub fn select_all_button(&self, doc: &Document, instance: Id) -> Option<Id> {
        doc.query_selector(instance, &self.markers.select_all)
    }

    pub fn select_none_button(&self, doc: &Document, instance: Id) -> Option<Id> {
        doc.query_selector(instance, &self.markers.select_none)
    }

    pub fn search_input(&self, doc: &Document, instance: Id) -> Option<Id> {
        doc.query_selector(instance, &self.markers.search)
    }

    pub fn list(&self, doc: &Document, instance: Id) -> Option<Id> {
        doc.query_selector(instance, &self.markers.list)
    }

    /// `<li>` descendants of the list; empty without a list.
    pub fn list_items(&self, doc: &Document, instance: Id) -> Vec<Id> {
        self.list(doc, instance)
            .map(|list| doc.query_selector_all(list, &self.markers.list_item))
            .unwrap_or_default()
    }

    pub fn submit_button(&self, doc: &Document, instance: Id) -> Option<Id> {
        doc.query_selector(instance, &self.markers.submit)
    }

    pub fn clear_button(&self, doc: &Document, instance: Id) -> Option<Id> {
        doc.query_selector(instance, &self.markers.clear)
    }

    pub fn checkboxes(&self, doc: &Document, instance: Id) -> Vec<Id> {
        doc.query_selector_all(instance, &self.markers.checkbox)
    }

    pub fn checked_checkboxes(&self, doc: &Document, instance: Id) -> Vec<Id> {
        let mut boxes = self.checkboxes(doc, instance);
        boxes.retain(|c| doc.is_checked(*c));
        boxes
    }

    pub fn unchecked_checkboxes(&self, doc: &Document, instance: Id) -> Vec<Id> {
        let mut boxes = self.checkboxes(doc, instance);
        boxes.retain(|c| !doc.is_checked(*c));
        boxes
    }

    // ---------------------------------------------------------------------
    // Reload persistence
    // ---------------------------------------------------------------------

    /// Whether markup asks for the dropdown to come back open after reloads.
    pub fn should_open_on_load(&self, doc: &Document, instance: Id) -> bool {
        doc.has_attr(instance, &self.markers.persist_open_attr)
    }

    pub fn is_persisted_on_load(&self, doc: &Document, instance: Id) -> bool {
        self.persisted_on_load.contains(self.id_of(doc, instance))
    }

    pub fn persist_on_load(&mut self, doc: &Document, instance: Id) {
        let id = self.key(doc, instance);
        if self.persisted_on_load.insert(id.clone()) {
            log::trace!(target: LOG_TARGET, "persist {id:?} on load");
        }
    }

    /// Cancels reopening after reload. Remembered search text goes with it.
    pub fn do_not_persist_on_load(&mut self, doc: &Document, instance: Id) {
        let id = self.id_of(doc, instance);
        if self.persisted_on_load.remove(id) {
            log::trace!(target: LOG_TARGET, "stop persisting {id:?}");
        }
        self.search.remove(id);
    }

    // ---------------------------------------------------------------------
    // Focus across reloads
    // ---------------------------------------------------------------------

    /// Requests focus after the next reload: on the element re-rendered in
    /// place of `element`, or on the results region for `None`.
    pub fn set_focus(&mut self, doc: &Document, element: Option<Id>) {
        self.focus = element.map(|el| self.selector_of(doc, el));
        self.should_focus = true;
        log::trace!(target: LOG_TARGET, "focus after reload: {:?}", self.focus);
    }

    /// Selector to focus after a reload, or `None` when nothing was requested.
    pub fn pending_focus(&self) -> Option<&str> {
        if !self.should_focus {
            return None;
        }
        Some(
            self.focus
                .as_deref()
                .unwrap_or(&self.config.results_selector),
        )
    }

    pub fn is_focus_pending(&self) -> bool {
        self.should_focus
    }

    /// Marks the pending focus request as consumed.
    pub fn clear_focus(&mut self) {
        self.should_focus = false;
        self.focus = None;
    }

    // ---------------------------------------------------------------------
    // Search text
    // ---------------------------------------------------------------------

    pub fn set_search(&mut self, doc: &Document, instance: Id, value: &str) {
        if value.is_empty() {
            let id = self.id_of(doc, instance);
            self.search.remove(id);
        } else {
            let id = self.key(doc, instance);
            self.search.insert(id, value.to_string());
        }
    }

    pub fn search_text(&self, doc: &Document, instance: Id) -> &str {
        self.search
            .get(self.id_of(doc, instance))
            .map_or("", String::as_str)
    }

    // ---------------------------------------------------------------------
    // Open state
    // ---------------------------------------------------------------------

    pub fn is_open(&self, doc: &Document, instance: Id) -> bool {
        self.opened.contains(self.id_of(doc, instance))
    }

    /// Ids of the open dropdowns, sorted.
    pub fn opened(&self) -> impl Iterator<Item = &str> + '_ {
        self.opened.iter().map(String::as_str)
    }

    fn key(&self, doc: &Document, instance: Id) -> String {
        let id = self.id_of(doc, instance);
        if id.is_empty() {
            log::debug!(
                target: LOG_TARGET,
                "dropdown {instance} has no {} attribute",
                self.config.id_attribute
            );
        }
        id.to_string()
    }
}
