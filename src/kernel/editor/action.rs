use super::state::{CursorPosition, DocumentId, SplitMode};

#[derive(Debug, Clone)]
pub enum EditorAction {
    UpdateContent {
        id: DocumentId,
        text: String,
    },
    UpdateCursor {
        id: DocumentId,
        position: CursorPosition,
    },
    UpdateScroll {
        id: DocumentId,
        scroll_top: u32,
    },
    SetViewState {
        id: DocumentId,
        view_state: Option<serde_json::Value>,
    },
    Save {
        id: DocumentId,
    },
    SaveAll,
    Revert {
        id: DocumentId,
    },
    Close {
        id: DocumentId,
    },
    ForceClose {
        id: DocumentId,
    },
    CloseOthers {
        id: DocumentId,
    },
    CloseAll,
    ConfirmPendingClose,
    CancelPendingClose,
    SetActive {
        id: DocumentId,
    },
    SetSecondaryActive {
        id: Option<DocumentId>,
    },
    SetSplitMode {
        mode: SplitMode,
    },
    ReorderTabs {
        from: usize,
        to: usize,
    },
}
