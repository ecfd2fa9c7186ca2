use std::fmt;

use crate::kernel::editor::{DocumentId, SessionError};
use crate::kernel::services::ports::{AutoSave, ContentError, ContentProvider};
use crate::models::{FileTreeError, NodeKind, PathEvent};

use super::{Action, AppState, EditorAction, Effect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    Tree(FileTreeError),
    Session(SessionError),
    Content(ContentError),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::Tree(e) => write!(f, "{}", e),
            KernelError::Session(e) => write!(f, "{}", e),
            KernelError::Content(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for KernelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KernelError::Tree(e) => Some(e),
            KernelError::Session(e) => Some(e),
            KernelError::Content(e) => Some(e),
        }
    }
}

impl From<FileTreeError> for KernelError {
    fn from(e: FileTreeError) -> Self {
        KernelError::Tree(e)
    }
}

impl From<SessionError> for KernelError {
    fn from(e: SessionError) -> Self {
        KernelError::Session(e)
    }
}

impl From<ContentError> for KernelError {
    fn from(e: ContentError) -> Self {
        KernelError::Content(e)
    }
}

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
    /// Document opened or focused by the action, if any.
    pub document: Option<DocumentId>,
}

impl DispatchResult {
    fn changed(state_changed: bool) -> Self {
        Self {
            state_changed,
            ..Self::default()
        }
    }

    fn with_effects(state_changed: bool, effects: Vec<Effect>) -> Self {
        Self {
            effects,
            state_changed,
            document: None,
        }
    }
}

pub struct Store {
    state: AppState,
    content: Box<dyn ContentProvider>,
}

impl Store {
    pub fn new(state: AppState, content: Box<dyn ContentProvider>) -> Self {
        Self { state, content }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn content(&self) -> &dyn ContentProvider {
        self.content.as_ref()
    }

    pub fn dispatch(&mut self, action: Action) -> Result<DispatchResult, KernelError> {
        tracing::debug!(?action, "dispatch");
        let result = self.dispatch_inner(action);
        if let Err(err) = &result {
            tracing::warn!(error = %err, "action rejected");
        }
        result
    }

    fn dispatch_inner(&mut self, action: Action) -> Result<DispatchResult, KernelError> {
        match action {
            Action::CreateNode {
                parent,
                name,
                kind,
                content,
            } => self.create_node(&parent, &name, kind, content),
            Action::RenameNode { path, new_name } => self.rename_node(&path, &new_name),
            Action::DeleteNode { path } => self.delete_node(&path),
            Action::OpenPath(path) => self.open_path(&path),
            Action::Editor(editor_action) => self.dispatch_editor(editor_action),
            Action::AutoSave { idle_ms } => self.auto_save_after_delay(idle_ms),
            Action::ExplorerSelect { path } => {
                Ok(DispatchResult::changed(self.state.explorer.select(path)))
            }
            Action::ExplorerToggleFolder { path } => {
                let changed = self.state.tree.find(&path).is_some_and(|n| n.is_folder())
                    && self.state.explorer.toggle(&path);
                Ok(DispatchResult::changed(changed))
            }
            Action::ExplorerExpandFolder { path } => {
                Ok(DispatchResult::changed(self.state.explorer.expand(&path)))
            }
            Action::ExplorerCollapseFolder { path } => {
                Ok(DispatchResult::changed(self.state.explorer.collapse(&path)))
            }
            Action::ExplorerExpandAll => Ok(DispatchResult::changed(
                self.state.explorer.expand_all(&self.state.tree),
            )),
            Action::ExplorerCollapseAll => {
                Ok(DispatchResult::changed(self.state.explorer.collapse_all()))
            }
            Action::ExplorerSetFilterQuery { query } => self.set_filter_query(query),
            Action::FindSetQuery { query } => {
                let text = self.active_text();
                Ok(DispatchResult::changed(
                    self.state.find.set_query(query, &text),
                ))
            }
            Action::FindToggleCaseSensitive => {
                let text = self.active_text();
                Ok(DispatchResult::changed(
                    self.state.find.toggle_case_sensitive(&text),
                ))
            }
            Action::FindToggleWholeWord => {
                let text = self.active_text();
                Ok(DispatchResult::changed(
                    self.state.find.toggle_whole_word(&text),
                ))
            }
            Action::FindToggleRegex => {
                let text = self.active_text();
                Ok(DispatchResult::changed(
                    self.state.find.toggle_regex(&text),
                ))
            }
            Action::FindTogglePreserveCase => {
                Ok(DispatchResult::changed(self.state.find.toggle_preserve_case()))
            }
            Action::FindSetReplace { text } => {
                Ok(DispatchResult::changed(self.state.find.set_replace(text)))
            }
            Action::FindReplaceCurrent => {
                let text = self.active_text();
                match self.state.find.replace_current(&text) {
                    Some(out) => self.apply_replacement(out, 1),
                    None => Ok(DispatchResult::changed(false)),
                }
            }
            Action::FindReplaceAll => {
                let text = self.active_text();
                match self.state.find.replace_all(&text) {
                    Some((out, count)) => self.apply_replacement(out, count),
                    None => Ok(DispatchResult::changed(false)),
                }
            }
            Action::FindNext => {
                self.state.find.commit_query();
                Ok(DispatchResult::changed(self.state.find.next()))
            }
            Action::FindPrev => {
                self.state.find.commit_query();
                Ok(DispatchResult::changed(self.state.find.prev()))
            }
            Action::FindGoTo { index } => {
                Ok(DispatchResult::changed(self.state.find.go_to(index)))
            }
            Action::FindClear => Ok(DispatchResult::changed(self.state.find.clear())),
        }
    }

    fn create_node(
        &mut self,
        parent: &str,
        name: &str,
        kind: NodeKind,
        content: Option<String>,
    ) -> Result<DispatchResult, KernelError> {
        let parent_path = self
            .state
            .tree
            .find(parent)
            .ok_or_else(|| FileTreeError::NotFound(parent.to_string()))?
            .path;
        let node = self.state.tree.create_node(parent, name, kind)?;
        if kind == NodeKind::File {
            let text = content.as_deref().unwrap_or_default();
            if let Err(err) = self.content.write(&node.path, text) {
                tracing::warn!(path = %node.path, error = %err, "initial write failed");
                if let Err(rollback) = self.state.tree.delete_id(node.id) {
                    tracing::error!(path = %node.path, error = %rollback, "rollback failed");
                }
                return Err(err.into());
            }
        }
        tracing::info!(path = %node.path, ?kind, "node created");

        self.state.explorer.expand(&parent_path);
        self.state.explorer.select(Some(node.path));
        Ok(DispatchResult::with_effects(
            true,
            vec![Effect::RevealPaths(vec![parent_path])],
        ))
    }

    fn rename_node(&mut self, path: &str, new_name: &str) -> Result<DispatchResult, KernelError> {
        let renamed = self.state.tree.rename_node(path, new_name)?;
        if renamed.events.is_empty() {
            return Ok(DispatchResult::changed(false));
        }
        tracing::info!(from = %renamed.old_path, to = %renamed.node.path, "node renamed");

        self.apply_path_events(&renamed.events);
        // 树已提交；内容表跟不上时只记录
        if let Err(err) = self.content.rename(&renamed.old_path, &renamed.node.path) {
            tracing::warn!(from = %renamed.old_path, error = %err, "content rename failed");
        }
        Ok(DispatchResult::with_effects(
            true,
            vec![Effect::PathsChanged(renamed.events)],
        ))
    }

    fn delete_node(&mut self, path: &str) -> Result<DispatchResult, KernelError> {
        let node = self
            .state
            .tree
            .find(path)
            .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
        let events = self.state.tree.delete_id(node.id)?;
        tracing::info!(path = %node.path, removed = events.len(), "node deleted");

        let mut effects: Vec<Effect> = self
            .apply_path_events(&events)
            .into_iter()
            .map(Effect::DocumentClosed)
            .collect();
        if let Err(err) = self.content.remove(&node.path) {
            tracing::warn!(path = %node.path, error = %err, "content remove failed");
        }
        effects.push(Effect::PathsChanged(events));
        self.refresh_find();
        Ok(DispatchResult::with_effects(true, effects))
    }

    /// Delivers tree events, in order, to the session and the explorer. Returns the
    /// documents closed because their node went away.
    fn apply_path_events(&mut self, events: &[PathEvent]) -> Vec<DocumentId> {
        let mut closed = Vec::new();
        for event in events {
            match event {
                PathEvent::Renamed { old_path, new_path } => {
                    if let Some(id) = self.state.session.reconcile_rename(old_path, new_path) {
                        tracing::debug!(%id, %new_path, "document follows rename");
                    }
                }
                PathEvent::Deleted { path } => {
                    if let Some(id) = self.state.session.reconcile_delete(path) {
                        tracing::debug!(%id, %path, "document closed by delete");
                        closed.push(id);
                    }
                }
            }
            self.state.explorer.apply(event);
        }
        closed
    }

    /// Folders toggle; files open (or refocus) a document.
    fn open_path(&mut self, path: &str) -> Result<DispatchResult, KernelError> {
        let node = self
            .state
            .tree
            .find(path)
            .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
        if node.is_folder() {
            self.state.explorer.toggle(&node.path);
            self.state.explorer.select(Some(node.path));
            return Ok(DispatchResult::changed(true));
        }

        let previous = self.state.session.active();
        let id = self.state.session.open(&node.path, self.content.as_ref())?;
        if let Some(prev) = previous.filter(|prev| *prev != id) {
            self.save_on_focus_change(prev);
        }
        self.state.explorer.select(Some(node.path));
        self.refresh_find();
        Ok(DispatchResult {
            effects: Vec::new(),
            state_changed: true,
            document: Some(id),
        })
    }

    fn dispatch_editor(&mut self, action: EditorAction) -> Result<DispatchResult, KernelError> {
        let mut saved_any = false;
        let blurred = match &action {
            EditorAction::SetActive { id } => {
                self.state.session.active().filter(|prev| prev != id)
            }
            _ => None,
        };
        let document = match &action {
            EditorAction::Save { id } => {
                self.write_through(*id)?;
                Some(*id)
            }
            EditorAction::SaveAll => {
                let dirty: Vec<DocumentId> = self
                    .state
                    .session
                    .documents()
                    .iter()
                    .filter(|d| d.is_dirty())
                    .map(|d| d.id())
                    .collect();
                saved_any = !dirty.is_empty();
                for id in dirty {
                    self.write_through(id)?;
                    self.state.session.save(id)?;
                }
                None
            }
            EditorAction::SetActive { id } => Some(*id),
            _ => None,
        };

        let refresh = matches!(
            action,
            EditorAction::UpdateContent { .. }
                | EditorAction::Revert { .. }
                | EditorAction::SetActive { .. }
                | EditorAction::Close { .. }
                | EditorAction::ForceClose { .. }
                | EditorAction::CloseOthers { .. }
                | EditorAction::CloseAll
                | EditorAction::ConfirmPendingClose
        );
        let (changed, effects) = self.state.session.dispatch_action(action)?;
        if let Some(prev) = blurred {
            saved_any |= self.save_on_focus_change(prev);
        }
        let state_changed = changed || saved_any;
        if refresh && state_changed {
            self.refresh_find();
        }
        Ok(DispatchResult {
            effects,
            state_changed,
            document,
        })
    }

    /// Persists the document's text before the session moves its baseline. On failure the
    /// document stays dirty.
    fn write_through(&mut self, id: DocumentId) -> Result<(), KernelError> {
        let doc = self
            .state
            .session
            .get(id)
            .ok_or(SessionError::NotFound(id))?;
        if !doc.is_dirty() {
            return Ok(());
        }
        if let Err(err) = self.content.write(doc.path(), doc.content()) {
            tracing::warn!(%id, path = doc.path(), error = %err, "save failed");
            return Err(err.into());
        }
        tracing::info!(%id, path = doc.path(), "document saved");
        Ok(())
    }

    /// Saves the document that just lost focus under `AutoSave::OnFocusChange`. A failed
    /// write leaves it dirty and does not undo the focus change.
    fn save_on_focus_change(&mut self, id: DocumentId) -> bool {
        if self.state.settings.editor.auto_save != AutoSave::OnFocusChange {
            return false;
        }
        if !self.state.session.get(id).is_some_and(|d| d.is_dirty()) {
            return false;
        }
        if self.write_through(id).is_err() {
            return false;
        }
        self.state.session.save(id).unwrap_or(false)
    }

    fn auto_save_after_delay(&mut self, idle_ms: u64) -> Result<DispatchResult, KernelError> {
        let editor = &self.state.settings.editor;
        if editor.auto_save != AutoSave::AfterDelay || idle_ms < editor.auto_save_delay_ms {
            return Ok(DispatchResult::changed(false));
        }
        self.dispatch_editor(EditorAction::SaveAll)
    }

    /// Replacement text goes through the session like a normal edit, so dirty tracking holds.
    fn apply_replacement(
        &mut self,
        text: String,
        count: usize,
    ) -> Result<DispatchResult, KernelError> {
        let Some(id) = self.state.session.active() else {
            return Ok(DispatchResult::changed(false));
        };
        self.state.session.update_content(id, text)?;
        tracing::info!(%id, count, "matches replaced");
        self.refresh_find();
        Ok(DispatchResult {
            effects: Vec::new(),
            state_changed: true,
            document: Some(id),
        })
    }

    fn set_filter_query(&mut self, query: String) -> Result<DispatchResult, KernelError> {
        if !self.state.explorer.set_query(query) {
            return Ok(DispatchResult::changed(false));
        }
        let query = self.state.explorer.query().trim();
        let reveal = if query.is_empty() {
            Vec::new()
        } else {
            self.state
                .tree
                .filter(query)
                .map(|filtered| filtered.expand)
                .unwrap_or_default()
        };
        let effects = if reveal.is_empty() {
            Vec::new()
        } else {
            self.state.explorer.reveal(reveal.iter().cloned());
            vec![Effect::RevealPaths(reveal)]
        };
        Ok(DispatchResult::with_effects(true, effects))
    }

    fn active_text(&self) -> String {
        self.state
            .session
            .active_document()
            .map(|d| d.content().to_string())
            .unwrap_or_default()
    }

    fn refresh_find(&mut self) {
        if self.state.find.query.is_empty() {
            return;
        }
        let text = self.active_text();
        self.state.find.refresh(&text);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
