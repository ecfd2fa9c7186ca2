use crate::kernel::editor::{DocumentId, PendingClose};
use crate::models::PathEvent;

/// Outward notifications produced by a dispatch. The host decides how to surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PromptUnsaved(PendingClose),
    DocumentClosed(DocumentId),
    PathsChanged(Vec<PathEvent>),
    RevealPaths(Vec<String>),
}
