use crate::kernel::editor::EditorAction;
use crate::models::NodeKind;

#[derive(Debug, Clone)]
pub enum Action {
    /// `content` seeds the provider for new files; `None` creates an empty file.
    CreateNode {
        parent: String,
        name: String,
        kind: NodeKind,
        content: Option<String>,
    },
    RenameNode {
        path: String,
        new_name: String,
    },
    DeleteNode {
        path: String,
    },
    OpenPath(String),
    Editor(EditorAction),
    /// Host-reported idle time since the last edit; saves dirty documents once it reaches
    /// `editor.auto_save_delay_ms` under `AutoSave::AfterDelay`.
    AutoSave {
        idle_ms: u64,
    },
    ExplorerSelect {
        path: Option<String>,
    },
    ExplorerToggleFolder {
        path: String,
    },
    ExplorerExpandFolder {
        path: String,
    },
    ExplorerCollapseFolder {
        path: String,
    },
    ExplorerExpandAll,
    ExplorerCollapseAll,
    ExplorerSetFilterQuery {
        query: String,
    },
    FindSetQuery {
        query: String,
    },
    FindToggleCaseSensitive,
    FindToggleWholeWord,
    FindToggleRegex,
    FindTogglePreserveCase,
    FindSetReplace {
        text: String,
    },
    /// Replaces the current match in the active document, then moves on to the next one.
    FindReplaceCurrent,
    FindReplaceAll,
    FindNext,
    FindPrev,
    FindGoTo {
        index: usize,
    },
    FindClear,
}
