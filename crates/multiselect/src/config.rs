//! Controller-wide settings and the per-dropdown settings read from markup.

use dom::{Document, Id};

use crate::attrs::Markers;

pub const DEFAULT_ATTRIBUTE: &str = "data-multiselect-dropdown";
pub const DEFAULT_ID_ATTRIBUTE: &str = "data-drupal-selector";
/// Where focus goes after a reload when no element was remembered.
pub const DEFAULT_RESULTS_SELECTOR: &str =
    ".view-content, .view-empty, [data-multiselect-dropdown-view-results]";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Marker attribute on each dropdown root. Sub-element markers are
    /// `<attribute>-toggle`, `<attribute>-dialog` and so on.
    pub attribute: String,
    /// Attribute whose value identifies an element across reloads.
    pub id_attribute: String,
    pub results_selector: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
            results_selector: DEFAULT_RESULTS_SELECTOR.to_string(),
        }
    }
}

/// Viewport width at or below which the dialog opens modally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Breakpoint {
    /// Never modal.
    Dialog,
    /// Always modal.
    Modal,
    Width(i64),
    /// Missing or unparsable; never modal.
    Invalid,
}

impl Breakpoint {
    pub const DIALOG: &'static str = "dialog";
    pub const MODAL: &'static str = "modal";

    /// Reads a breakpoint attribute value. Numbers are read the lenient way
    /// markup authors expect: leading whitespace, an optional sign, then
    /// digits, ignoring anything after them (`"512px"` is 512).
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Breakpoint::Invalid;
        };
        match value {
            Self::DIALOG => Breakpoint::Dialog,
            Self::MODAL => Breakpoint::Modal,
            other => parse_leading_int(other).map_or(Breakpoint::Invalid, Breakpoint::Width),
        }
    }

    pub fn is_modal_at(self, viewport_width: u32) -> bool {
        match self {
            Breakpoint::Dialog | Breakpoint::Invalid => false,
            Breakpoint::Modal => true,
            Breakpoint::Width(w) => i64::from(viewport_width) <= w,
        }
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Absurdly long numbers saturate rather than fail.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Minimum search length before filtering kicks in. Missing or non-numeric
/// values mean no threshold; fractional values round up.
pub(crate) fn parse_threshold(value: Option<&str>) -> usize {
    let Some(n) = value.and_then(|v| v.trim().parse::<f64>().ok()) else {
        return 0;
    };
    if !n.is_finite() || n <= 0.0 {
        return 0;
    }
    n.ceil() as usize
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTemplates {
    pub none: String,
    pub single: String,
    pub plural: String,
    pub all: String,
}

impl LabelTemplates {
    pub(crate) fn read(doc: &Document, markers: &Markers, instance: Id) -> Self {
        let attr = |name: &str| doc.attr(instance, name).unwrap_or_default().to_string();
        Self {
            none: attr(&markers.label_none_attr),
            single: attr(&markers.label_single_attr),
            plural: attr(&markers.label_plural_attr),
            all: attr(&markers.label_all_attr),
        }
    }
}

/// Everything a dropdown declares about itself in markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropdownConfig {
    pub id: String,
    pub breakpoint: Breakpoint,
    pub persist_open: bool,
    pub labels: LabelTemplates,
    pub search_threshold: usize,
}

impl DropdownConfig {
    pub(crate) fn read(doc: &Document, markers: &Markers, id_attribute: &str, instance: Id) -> Self {
        let search_threshold = doc
            .query_selector(instance, &markers.search)
            .map_or(0, |search| {
                parse_threshold(doc.attr(search, &markers.search_threshold_attr))
            });
        Self {
            id: doc.attr(instance, id_attribute).unwrap_or_default().to_string(),
            breakpoint: Breakpoint::parse(doc.attr(instance, &markers.breakpoint_attr)),
            persist_open: doc.has_attr(instance, &markers.persist_open_attr),
            labels: LabelTemplates::read(doc, markers, instance),
            search_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_sentinels_and_numbers() {
        assert_eq!(Breakpoint::parse(Some("dialog")), Breakpoint::Dialog);
        assert_eq!(Breakpoint::parse(Some("modal")), Breakpoint::Modal);
        assert_eq!(Breakpoint::parse(Some("512")), Breakpoint::Width(512));
        assert_eq!(Breakpoint::parse(Some(" 768px")), Breakpoint::Width(768));
        assert_eq!(Breakpoint::parse(Some("-1")), Breakpoint::Width(-1));
        assert_eq!(Breakpoint::parse(Some("wide")), Breakpoint::Invalid);
        assert_eq!(Breakpoint::parse(Some("")), Breakpoint::Invalid);
        assert_eq!(Breakpoint::parse(None), Breakpoint::Invalid);
        // sentinels are case-sensitive
        assert_eq!(Breakpoint::parse(Some("Modal")), Breakpoint::Invalid);
    }

    #[test]
    fn modal_decision_is_inclusive_at_the_breakpoint() {
        let bp = Breakpoint::Width(512);
        assert!(bp.is_modal_at(400));
        assert!(bp.is_modal_at(512));
        assert!(!bp.is_modal_at(513));
        assert!(Breakpoint::Modal.is_modal_at(u32::MAX));
        assert!(!Breakpoint::Dialog.is_modal_at(0));
        assert!(!Breakpoint::Invalid.is_modal_at(0));
    }

    #[test]
    fn threshold_parsing() {
        assert_eq!(parse_threshold(Some("3")), 3);
        assert_eq!(parse_threshold(Some(" 2 ")), 2);
        assert_eq!(parse_threshold(Some("2.5")), 3);
        assert_eq!(parse_threshold(Some("-4")), 0);
        assert_eq!(parse_threshold(Some("three")), 0);
        assert_eq!(parse_threshold(None), 0);
    }
}
