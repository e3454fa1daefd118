use thiserror::Error;

/// Errors a picker can surface. Everything else the widget encounters
/// (clicks on empty cells, blank time edits) is a documented no-op.
#[derive(Debug, Error)]
pub enum PickerError {
    /// Construction was given a selector no host pane matches.
    #[error("no host pane matches selector {0:?}")]
    InvalidTarget(String),

    /// `on` was given an event name the picker does not emit.
    #[error("{0:?} is not a valid picker event")]
    InvalidEventName(String),

    /// Month navigation was requested before any month was rendered.
    #[error("{0} called before an initial month was rendered")]
    UninitializedCursor(&'static str),
}
