//! # dom
//!
//! Live document model for the multiselect dropdown runtime.
//!
//! Markup is described with the owned [`Node`] tree and loaded into a
//! [`Document`], an arena of live nodes with parent links. The document owns
//! everything a page script would observe or mutate:
//! - element attributes and text
//! - form control state (checkbox `checked`, text `value`)
//! - inline `display` style
//! - dialog surfaces (non-modal / modal / closed)
//! - the focused element and the viewport width
//! - a queue of [`DomEvent`]s delivered in order
//!
//! Lookups go through a small parsed [`SelectorList`], enough to address
//! elements by attribute, class and tag.

mod dialog;
mod document;
mod events;
mod focus;
mod forms;
mod selector;
#[cfg(any(test, feature = "dom-snapshot"))]
pub mod snapshot;
mod text;
mod types;

pub use dialog::DialogMode;
pub use document::{Descendants, Display, Document, DomError};
pub use events::DomEvent;
pub use focus::FocusOptions;
pub use forms::InputControlType;
pub use selector::{SelectorError, SelectorList, quote_selector_value};
pub use text::contains_ignore_case;
pub use types::{Attribute, Id, Node, NodeId};
