//! Multiselect filter dropdowns for server-rendered forms.
//!
//! The [`dom`] crate models the page the dropdowns live in; [`multiselect`]
//! holds the controller and the interaction wiring.

pub use dom;
pub use multiselect;
pub use multiselect::{Behaviors, Controller, ControllerConfig, DropdownError, Interaction};
