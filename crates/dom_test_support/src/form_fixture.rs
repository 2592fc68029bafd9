//! TOML-described filter forms rendered to dropdown markup.
//!
//! A fixture stands in for the server: it renders the form for a given
//! selection, and re-rendering it after a submission is what a partial
//! reload looks like to the page.

use dom::Node;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

pub const FORM_FIXTURE_FORMAT_V1: &str = "multiselect-form-v1";

const BASE: &str = "data-multiselect-dropdown";
const ID_ATTR: &str = "data-drupal-selector";

/// Checked option keys per dropdown id.
pub type Selection = BTreeMap<String, BTreeSet<String>>;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct FormFixture {
    pub format: String,
    pub form_id: String,
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    #[serde(default)]
    pub results: Option<ResultsRegion>,
    pub dropdowns: Vec<DropdownFixture>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultsRegion {
    /// `.view-content`
    Content,
    /// `.view-empty`
    Empty,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DropdownFixture {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub breakpoint: Option<String>,
    #[serde(default)]
    pub persist_open: bool,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub close_label: Option<String>,
    #[serde(default)]
    pub select_all_label: Option<String>,
    #[serde(default)]
    pub select_none_label: Option<String>,
    #[serde(default)]
    pub submit_label: Option<String>,
    #[serde(default)]
    pub clear_label: Option<String>,
    #[serde(default)]
    pub search: Option<SearchFixture>,
    #[serde(default)]
    pub options: Vec<OptionFixture>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Labels {
    #[serde(default)]
    pub none: Option<String>,
    #[serde(default)]
    pub single: Option<String>,
    #[serde(default)]
    pub plural: Option<String>,
    #[serde(default)]
    pub all: Option<String>,
    /// Server-rendered toggle text before the first label update.
    #[serde(default)]
    pub initial: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SearchFixture {
    pub title: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub threshold: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct OptionFixture {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub depth: Option<u32>,
}

fn default_submit_label() -> String {
    "Submit".to_string()
}

/// Loads and validates a fixture, panicking with the path on any problem.
pub fn load_form_fixture(path: &Path) -> FormFixture {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read form fixture {path:?}: {err}"));
    let fixture: FormFixture = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse form fixture {path:?}: {err}"));
    fixture.validate(path);
    fixture
}

impl FormFixture {
    fn validate(&self, path: &Path) {
        assert_eq!(
            self.format, FORM_FIXTURE_FORMAT_V1,
            "unsupported form fixture format in {path:?}"
        );
        let mut ids = BTreeSet::new();
        for dropdown in &self.dropdowns {
            assert!(
                ids.insert(dropdown.id.as_str()),
                "duplicate dropdown id in {path:?}: {}",
                dropdown.id
            );
            let mut keys = BTreeSet::new();
            for option in &dropdown.options {
                assert!(
                    keys.insert(option.key.as_str()),
                    "duplicate option key in {path:?}: {}/{}",
                    dropdown.id,
                    option.key
                );
            }
        }
    }

    pub fn dropdown(&self, id: &str) -> Option<&DropdownFixture> {
        self.dropdowns.iter().find(|d| d.id == id)
    }

    /// The whole page: the form followed by the results region.
    pub fn render_page(&self, selection: &Selection) -> Node {
        let mut children = vec![self.render_form(selection)];
        if let Some(results) = self.results {
            let class = match results {
                ResultsRegion::Content => "view-content",
                ResultsRegion::Empty => "view-empty",
            };
            children.push(Node::element("div").with_attr("class", class));
        }
        Node::document(children)
    }

    pub fn render_form(&self, selection: &Selection) -> Node {
        let empty = BTreeSet::new();
        let dropdowns = self
            .dropdowns
            .iter()
            .map(|d| d.render(selection.get(&d.id).unwrap_or(&empty)));
        Node::element("form")
            .with_attr("id", self.form_id.clone())
            .with_attr(ID_ATTR, self.form_id.clone())
            .with_children(dropdowns)
            .with_child(
                Node::element("input")
                    .with_attr("type", "submit")
                    .with_attr(ID_ATTR, "edit-submit")
                    .with_attr("value", self.submit_label.clone()),
            )
    }
}

fn marker(suffix: &str) -> String {
    format!("{BASE}-{suffix}")
}

fn button(suffix: &str, id: String, label: &str) -> Node {
    Node::element("button")
        .with_attr("type", "button")
        .with_flag(&marker(suffix))
        .with_attr(ID_ATTR, id)
        .with_child(Node::text(label))
}

impl DropdownFixture {
    fn render(&self, checked: &BTreeSet<String>) -> Node {
        let id = &self.id;
        let dialog_id = format!("{id}-dialog");

        let mut root = Node::element("div")
            .with_flag(BASE)
            .with_attr(ID_ATTR, id.clone());
        if let Some(breakpoint) = &self.breakpoint {
            root = root.with_attr(&marker("breakpoint"), breakpoint.clone());
        }
        if self.persist_open {
            root = root.with_flag(&marker("persist-open"));
        }
        for (suffix, template) in [
            ("label-none", &self.labels.none),
            ("label-single", &self.labels.single),
            ("label-plural", &self.labels.plural),
            ("label-all", &self.labels.all),
        ] {
            if let Some(template) = template {
                root = root.with_attr(&marker(suffix), template.clone());
            }
        }

        let mut toggle = Node::element("button")
            .with_attr("type", "button")
            .with_flag(&marker("toggle"))
            .with_attr(ID_ATTR, format!("{id}-toggle"))
            .with_attr("aria-expanded", "false")
            .with_attr("aria-controls", dialog_id.clone());
        if let Some(initial) = &self.labels.initial {
            toggle = toggle.with_child(Node::text(initial.clone()));
        }

        let mut dialog = Node::element("dialog")
            .with_flag(&marker("dialog"))
            .with_attr("id", dialog_id);
        if let Some(label) = &self.close_label {
            dialog = dialog.with_child(button("dialog-close", format!("{id}-close"), label));
        }
        if let Some(search) = &self.search {
            let search_id = format!("{id}-search");
            dialog = dialog.with_child(
                Node::element("label")
                    .with_attr("for", search_id.clone())
                    .with_child(Node::text(search.title.clone())),
            );
            let mut input = Node::element("input")
                .with_attr("type", "search")
                .with_attr("id", search_id.clone())
                .with_attr(ID_ATTR, search_id)
                .with_flag(&marker("search"));
            if let Some(placeholder) = &search.placeholder {
                input = input.with_attr("placeholder", placeholder.clone());
            }
            if let Some(threshold) = &search.threshold {
                input = input.with_attr(&marker("search-character-threshold"), threshold.clone());
            }
            dialog = dialog.with_child(input);
        }
        if let Some(label) = &self.select_all_label {
            dialog = dialog.with_child(button("select-all", format!("{id}-select-all"), label));
        }
        if let Some(label) = &self.select_none_label {
            dialog = dialog.with_child(button("select-none", format!("{id}-select-none"), label));
        }

        let items = self.options.iter().map(|option| option.render(self, checked));
        dialog = dialog.with_child(
            Node::element("ul")
                .with_flag(&marker("list"))
                .with_attr("role", "listbox")
                .with_attr("tabindex", "-1")
                .with_children(items),
        );
        if let Some(label) = &self.submit_label {
            dialog = dialog.with_child(button("submit", format!("{id}-submit"), label));
        }
        if let Some(label) = &self.clear_label {
            dialog = dialog.with_child(button("clear", format!("{id}-clear"), label));
        }

        root.with_children([toggle, dialog])
    }
}

impl OptionFixture {
    fn render(&self, dropdown: &DropdownFixture, checked: &BTreeSet<String>) -> Node {
        let option_id = format!("{}-{}", dropdown.id, self.key.replace('_', "-"));
        let mut input = Node::element("input")
            .with_attr("type", "checkbox")
            .with_attr("id", option_id.clone())
            .with_attr(ID_ATTR, option_id.clone())
            .with_attr("name", format!("{}[{}]", dropdown.name, self.key))
            .with_attr("value", self.key.clone())
            .with_attr("role", "option");
        if let Some(depth) = self.depth.filter(|d| *d > 0) {
            input = input.with_attr(&marker("depth"), depth.to_string());
        }
        if checked.contains(&self.key) {
            input = input.with_flag("checked");
        }
        Node::element("li").with_children([
            input,
            Node::element("label")
                .with_attr("for", option_id)
                .with_child(Node::text(self.label.clone())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{Document, SelectorList};

    const MINIMAL: &str = r#"
format = "multiselect-form-v1"
form_id = "test-form"
results = "empty"

[[dropdowns]]
id = "edit-colors"
name = "colors"
breakpoint = "512"

[dropdowns.labels]
none = "%d Colors Selected"

[[dropdowns.options]]
key = "red"
label = "Red"

[[dropdowns.options]]
key = "dark_red"
label = "Dark Red"
depth = 1
"#;

    #[test]
    fn renders_checked_state_and_markers() {
        let fixture: FormFixture = toml::from_str(MINIMAL).unwrap();
        let mut selection = Selection::new();
        selection.insert("edit-colors".into(), ["dark_red".to_string()].into());
        let doc = Document::from_node(fixture.render_page(&selection));

        let dark_red = doc
            .query_selector(
                doc.root(),
                &SelectorList::attribute_eq(ID_ATTR, "edit-colors-dark-red"),
            )
            .unwrap();
        assert!(doc.is_checked(dark_red));
        assert_eq!(doc.attr(dark_red, "name"), Some("colors[dark_red]"));
        assert_eq!(doc.attr(dark_red, "data-multiselect-dropdown-depth"), Some("1"));

        let root = doc
            .query_selector(doc.root(), &SelectorList::attribute(BASE))
            .unwrap();
        assert_eq!(doc.attr(root, "data-multiselect-dropdown-breakpoint"), Some("512"));
        assert!(
            doc.query_selector(doc.root(), &SelectorList::parse(".view-empty").unwrap())
                .is_some()
        );
    }

    #[test]
    #[should_panic(expected = "duplicate option key")]
    fn rejects_duplicate_option_keys() {
        let source = MINIMAL.replace("dark_red", "red");
        let fixture: FormFixture = toml::from_str(&source).unwrap();
        fixture.validate(Path::new("inline.toml"));
    }
}
