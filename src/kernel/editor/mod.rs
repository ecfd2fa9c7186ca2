//! Editor domain: open documents, dirty tracking and close arbitration.

mod action;
mod reducer;
mod state;

pub use action::EditorAction;
pub use state::{
    CloseOutcome, CursorPosition, DocumentId, OpenDocument, PendingClose, SessionError,
    SessionState, SplitMode,
};

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/state.rs"]
mod tests;
