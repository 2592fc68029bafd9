use dom::{DomError, SelectorError};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropdownError {
    /// The dropdown has no element carrying the dialog marker.
    MissingDialog { id: String, marker: String },
    Dom(DomError),
    /// A configured or remembered selector did not parse.
    Selector(SelectorError),
}

impl fmt::Display for DropdownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropdownError::MissingDialog { id, marker } => {
                write!(f, "dropdown {id:?} has no [{marker}] dialog")
            }
            DropdownError::Dom(err) => write!(f, "dom: {err}"),
            DropdownError::Selector(err) => write!(f, "selector: {err}"),
        }
    }
}

impl std::error::Error for DropdownError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DropdownError::Dom(err) => Some(err),
            DropdownError::Selector(err) => Some(err),
            DropdownError::MissingDialog { .. } => None,
        }
    }
}

impl From<DomError> for DropdownError {
    fn from(err: DomError) -> Self {
        DropdownError::Dom(err)
    }
}

impl From<SelectorError> for DropdownError {
    fn from(err: SelectorError) -> Self {
        DropdownError::Selector(err)
    }
}
