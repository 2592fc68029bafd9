#![allow(dead_code)]

use dom::{Display, Document, DomEvent, Id, SelectorList};
use dom_test_support::{FormFixture, Selection, load_form_fixture};
use multiselect::{Behaviors, Controller, Interaction};
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A test form page: the live document plus the host event loop around it.
pub struct Page {
    pub fixture: FormFixture,
    pub doc: Document,
    pub ctrl: Controller,
    pub behaviors: Behaviors,
    /// Submissions seen since the last reload.
    pub submissions: Vec<DomEvent>,
    pub reloads: usize,
}

impl Page {
    pub fn load(viewport_width: u32) -> Self {
        Self::load_with(viewport_width, |_| {})
    }

    /// Like [`Page::load`], with the fixture adjusted before the first render.
    pub fn load_with(viewport_width: u32, edit: impl FnOnce(&mut FormFixture)) -> Self {
        let mut fixture = load_form_fixture(&fixture_path("test_form.toml"));
        edit(&mut fixture);
        let mut doc = Document::from_node(fixture.render_page(&Selection::new()));
        doc.set_viewport_width(viewport_width);
        let mut page = Self {
            fixture,
            doc,
            ctrl: Controller::default(),
            behaviors: Behaviors::new(),
            submissions: Vec::new(),
            reloads: 0,
        };
        let root = page.doc.root();
        page.behaviors
            .attach(&mut page.ctrl, &mut page.doc, root)
            .expect("initial attach");
        page
    }

    /// Element by its `data-drupal-selector`.
    pub fn el(&self, selector: &str) -> Id {
        self.try_el(selector)
            .unwrap_or_else(|| panic!("no element [data-drupal-selector={selector:?}]"))
    }

    pub fn try_el(&self, selector: &str) -> Option<Id> {
        self.doc.query_selector(
            self.doc.root(),
            &SelectorList::attribute_eq("data-drupal-selector", selector),
        )
    }

    pub fn query(&self, selector: &str) -> Option<Id> {
        let selector = SelectorList::parse(selector).expect("test selector");
        self.doc.query_selector(self.doc.root(), &selector)
    }

    pub fn dropdown(&self, id: &str) -> Id {
        let instance = self.el(id);
        assert!(self.ctrl.is_multiselect(&self.doc, instance), "{id} is not a dropdown");
        instance
    }

    pub fn dispatch(&mut self, interaction: Interaction) {
        self.behaviors
            .dispatch(&mut self.ctrl, &mut self.doc, interaction)
            .unwrap_or_else(|err| panic!("{interaction:?}: {err}"));
        self.pump();
    }

    /// User click on an element, followed by the window-level click.
    pub fn click(&mut self, target: Id) {
        if let Some(instance) = self.ctrl.instance_of(&self.doc, target)
            && self.ctrl.toggle_button(&self.doc, instance) == Some(target)
        {
            self.dispatch(Interaction::ToggleClick { instance });
        } else {
            self.doc.click(target).expect("click");
        }
        self.pump();
        self.dispatch(Interaction::WindowClick { target });
    }

    /// Presses the form's own submit button. The host submits on mousedown,
    /// so no window click reaches the dropdowns first.
    pub fn submit_form(&mut self) {
        let submit = self.el("edit-submit");
        self.doc.click(submit).expect("click submit");
        self.pump();
    }

    pub fn pump(&mut self) {
        let events = self
            .behaviors
            .pump(&mut self.ctrl, &mut self.doc)
            .expect("pump");
        self.submissions.extend(
            events
                .into_iter()
                .filter(|e| matches!(e, DomEvent::FormSubmitted { .. })),
        );
    }

    /// Types into a dropdown's search field.
    pub fn search(&mut self, dropdown: &str, text: &str) {
        let instance = self.dropdown(dropdown);
        let input = self
            .ctrl
            .search_input(&self.doc, instance)
            .expect("search input");
        self.doc.set_value(input, text).expect("set value");
        self.dispatch(Interaction::SearchInput { instance });
    }

    /// Answers the pending submission the way the server would: re-renders
    /// the form from the submitted checkbox state and re-attaches behaviors
    /// to the new markup.
    pub fn reload(&mut self) {
        assert!(
            !self.submissions.is_empty(),
            "reload without a pending submission"
        );
        self.submissions.clear();

        let selection = self.selection();
        let form = self.query("form").expect("form");
        let fresh = self
            .doc
            .replace_subtree(form, self.fixture.render_form(&selection))
            .expect("replace form")
            .expect("fixture renders a form");
        self.behaviors
            .attach(&mut self.ctrl, &mut self.doc, fresh)
            .expect("attach after reload");
        self.pump();
        self.reloads += 1;
    }

    pub fn selection(&self) -> Selection {
        let mut selection = Selection::new();
        for instance in self.ctrl.instances(&self.doc, self.doc.root()) {
            let id = self.ctrl.id_of(&self.doc, instance).to_string();
            let checked = self
                .ctrl
                .checked_checkboxes(&self.doc, instance)
                .into_iter()
                .filter_map(|c| self.doc.attr(c, "value").map(str::to_string))
                .collect();
            selection.insert(id, checked);
        }
        selection
    }

    pub fn is_open(&self, dropdown: &str) -> bool {
        let instance = self.dropdown(dropdown);
        self.ctrl.is_open(&self.doc, instance)
    }

    /// Asserts the markup reflects the open state: the root marker, the
    /// toggle's `aria-expanded` and the dialog's `open` attribute.
    pub fn assert_open_markup(&self, dropdown: &str, open: bool) {
        let instance = self.dropdown(dropdown);
        let toggle = self.ctrl.toggle_button(&self.doc, instance).expect("toggle");
        let dialog = self.ctrl.dialog(&self.doc, instance).expect("dialog");
        assert_eq!(
            self.doc.has_attr(instance, "data-multiselect-dropdown-open"),
            open,
            "{dropdown} open marker"
        );
        assert_eq!(
            self.doc.attr(toggle, "aria-expanded"),
            Some(if open { "true" } else { "false" }),
            "{dropdown} aria-expanded"
        );
        assert_eq!(self.doc.has_attr(dialog, "open"), open, "{dropdown} dialog open");
    }

    pub fn toggle_text(&self, dropdown: &str) -> String {
        let instance = self.dropdown(dropdown);
        let toggle = self.ctrl.toggle_button(&self.doc, instance).expect("toggle");
        self.doc.text_content(toggle)
    }

    pub fn visible_options(&self, dropdown: &str) -> Vec<String> {
        let instance = self.dropdown(dropdown);
        self.ctrl
            .list_items(&self.doc, instance)
            .into_iter()
            .filter(|item| self.doc.display(*item) != Display::None)
            .map(|item| self.doc.inner_text(item))
            .collect()
    }

    pub fn checkboxes(&self, dropdown: &str) -> Vec<Id> {
        let instance = self.dropdown(dropdown);
        self.ctrl.checkboxes(&self.doc, instance)
    }
}
