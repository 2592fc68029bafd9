use crate::types::Id;

/// Notifications raised by document mutations, drained with
/// [`Document::take_events`](crate::Document::take_events).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomEvent {
    /// An open dialog transitioned to closed, by script or by the surface
    /// dismissing itself.
    DialogClosed { dialog: Id },
    /// A checkbox changed through user activation.
    Change { target: Id },
    /// A form submission was requested. `submitter` is the activated submit
    /// control, or `None` for a direct `request_submit`.
    FormSubmitted { form: Id, submitter: Option<Id> },
}
