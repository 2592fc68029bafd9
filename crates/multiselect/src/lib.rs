//! # multiselect
//!
//! Headless multiselect dropdowns over a [`dom::Document`].
//!
//! A dropdown is a root element carrying the `data-multiselect-dropdown`
//! marker with a toggle button, a `<dialog>` and a list of checkboxes inside.
//! [`Controller`] holds the page-wide state (which dropdowns are open, which
//! should reopen after a partial reload, pending focus, remembered search
//! text) and performs the document mutations. [`Behaviors`] maps host
//! interactions onto controller calls.

mod attrs;
pub mod behaviors;
pub mod config;
mod controller;
mod error;
pub mod filter;
pub mod label;

pub use behaviors::{Behaviors, Interaction};
pub use config::{Breakpoint, ControllerConfig, DropdownConfig, LabelTemplates};
pub use controller::{Controller, Presentation};
pub use error::DropdownError;
