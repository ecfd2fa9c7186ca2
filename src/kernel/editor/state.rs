use std::fmt;

use crate::kernel::language::LanguageId;
use crate::kernel::services::ports::{ContentError, ContentProvider};
use crate::models::vpath;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// 1-based line/column, as reported by the editor widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: u32,
    pub column: u32,
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingClose {
    Document(DocumentId),
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    NeedsConfirmation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    NotFound(DocumentId),
    OthersDirty(DocumentId),
    InvalidIndex { index: usize, len: usize },
    Content(ContentError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotFound(id) => write!(f, "no open document {}", id),
            SessionError::OthersDirty(id) => {
                write!(f, "cannot close others than {}: unsaved changes", id)
            }
            SessionError::InvalidIndex { index, len } => {
                write!(f, "tab index {} out of range (len {})", index, len)
            }
            SessionError::Content(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Content(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContentError> for SessionError {
    fn from(e: ContentError) -> Self {
        SessionError::Content(e)
    }
}

pub struct OpenDocument {
    id: DocumentId,
    path: String,
    title: String,
    language: LanguageId,
    content: String,
    baseline: String,
    cursor: CursorPosition,
    scroll_top: u32,
    view_state: Option<serde_json::Value>,
}

impl fmt::Debug for OpenDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenDocument")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("language", &self.language)
            .field("dirty", &self.is_dirty())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl OpenDocument {
    fn from_content(id: DocumentId, path: String, content: String) -> Self {
        Self {
            id,
            title: vpath::file_name(&path).to_string(),
            language: LanguageId::from_path(&path),
            path,
            baseline: content.clone(),
            content,
            cursor: CursorPosition::default(),
            scroll_top: 0,
            view_state: None,
        }
    }

    fn set_path(&mut self, path: String) {
        self.title = vpath::file_name(&path).to_string();
        self.language = LanguageId::from_path(&path);
        self.path = path;
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn is_dirty(&self) -> bool {
        self.content != self.baseline
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    pub fn view_state(&self) -> Option<&serde_json::Value> {
        self.view_state.as_ref()
    }
}

#[derive(Debug)]
pub struct SessionState {
    documents: Vec<OpenDocument>,
    active: Option<DocumentId>,
    secondary_active: Option<DocumentId>,
    split: SplitMode,
    pending_close: Option<PendingClose>,
    next_id: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            active: None,
            secondary_active: None,
            split: SplitMode::None,
            pending_close: None,
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> DocumentId {
        let id = DocumentId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub fn documents(&self) -> &[OpenDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: DocumentId) -> Option<&OpenDocument> {
        self.documents.iter().find(|d| d.id == id)
    }

    fn get_mut(&mut self, id: DocumentId) -> Result<&mut OpenDocument, SessionError> {
        self.documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(SessionError::NotFound(id))
    }

    pub fn index_of(&self, id: DocumentId) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }

    pub fn find_by_path(&self, path: &str) -> Option<DocumentId> {
        self.documents.iter().find(|d| d.path == path).map(|d| d.id)
    }

    pub fn active(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn active_document(&self) -> Option<&OpenDocument> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn secondary_active(&self) -> Option<DocumentId> {
        self.secondary_active
    }

    pub fn split(&self) -> SplitMode {
        self.split
    }

    pub fn pending_close(&self) -> Option<PendingClose> {
        self.pending_close
    }

    pub fn has_dirty(&self) -> bool {
        self.documents.iter().any(OpenDocument::is_dirty)
    }

    /// Re-focuses an already open path without asking the provider again.
    pub fn open(
        &mut self,
        path: &str,
        provider: &dyn ContentProvider,
    ) -> Result<DocumentId, SessionError> {
        if let Some(id) = self.find_by_path(path) {
            self.active = Some(id);
            return Ok(id);
        }
        let content = provider.resolve(path)?;
        Ok(self.open_loaded(path, content))
    }

    pub fn open_loaded(&mut self, path: &str, content: String) -> DocumentId {
        if let Some(id) = self.find_by_path(path) {
            self.active = Some(id);
            return id;
        }
        let id = self.alloc_id();
        self.documents
            .push(OpenDocument::from_content(id, path.to_string(), content));
        self.active = Some(id);
        id
    }

    pub fn update_content(&mut self, id: DocumentId, text: String) -> Result<bool, SessionError> {
        let doc = self.get_mut(id)?;
        if doc.content == text {
            return Ok(false);
        }
        doc.content = text;
        Ok(true)
    }

    pub fn update_cursor(
        &mut self,
        id: DocumentId,
        position: CursorPosition,
    ) -> Result<bool, SessionError> {
        let doc = self.get_mut(id)?;
        let position = CursorPosition {
            line: position.line.max(1),
            column: position.column.max(1),
        };
        let changed = doc.cursor != position;
        doc.cursor = position;
        Ok(changed)
    }

    pub fn update_scroll(&mut self, id: DocumentId, scroll_top: u32) -> Result<bool, SessionError> {
        let doc = self.get_mut(id)?;
        let changed = doc.scroll_top != scroll_top;
        doc.scroll_top = scroll_top;
        Ok(changed)
    }

    pub fn set_view_state(
        &mut self,
        id: DocumentId,
        view_state: Option<serde_json::Value>,
    ) -> Result<bool, SessionError> {
        let doc = self.get_mut(id)?;
        doc.view_state = view_state;
        Ok(true)
    }

    pub fn save(&mut self, id: DocumentId) -> Result<bool, SessionError> {
        let doc = self.get_mut(id)?;
        if !doc.is_dirty() {
            return Ok(false);
        }
        doc.baseline = doc.content.clone();
        Ok(true)
    }

    pub fn save_all(&mut self) -> bool {
        let mut changed = false;
        for doc in self.documents.iter_mut().filter(|d| d.is_dirty()) {
            doc.baseline = doc.content.clone();
            changed = true;
        }
        changed
    }

    pub fn revert(&mut self, id: DocumentId) -> Result<bool, SessionError> {
        let doc = self.get_mut(id)?;
        if !doc.is_dirty() {
            return Ok(false);
        }
        doc.content = doc.baseline.clone();
        Ok(true)
    }

    /// Removes the document at `index` and picks the neighbour at the same index
    /// (clamped to the new last) when it was active.
    fn remove_at(&mut self, index: usize) -> Option<OpenDocument> {
        if index >= self.documents.len() {
            return None;
        }
        let removed = self.documents.remove(index);

        if self.active == Some(removed.id) {
            self.active = if self.documents.is_empty() {
                None
            } else {
                let next = index.min(self.documents.len() - 1);
                Some(self.documents[next].id)
            };
        }
        if self.secondary_active == Some(removed.id) {
            self.secondary_active = None;
        }
        if self.pending_close == Some(PendingClose::Document(removed.id)) {
            self.pending_close = None;
        }
        Some(removed)
    }

    pub fn close(&mut self, id: DocumentId) -> Result<CloseOutcome, SessionError> {
        let index = self.index_of(id).ok_or(SessionError::NotFound(id))?;
        if self.documents[index].is_dirty() {
            self.pending_close = Some(PendingClose::Document(id));
            return Ok(CloseOutcome::NeedsConfirmation);
        }
        self.remove_at(index);
        Ok(CloseOutcome::Closed)
    }

    pub fn force_close(&mut self, id: DocumentId) -> Result<(), SessionError> {
        let index = self.index_of(id).ok_or(SessionError::NotFound(id))?;
        self.remove_at(index);
        self.pending_close = None;
        Ok(())
    }

    pub fn close_others(&mut self, id: DocumentId) -> Result<bool, SessionError> {
        let index = self.index_of(id).ok_or(SessionError::NotFound(id))?;
        if self.documents.iter().any(|d| d.id != id && d.is_dirty()) {
            return Err(SessionError::OthersDirty(id));
        }
        let changed = self.documents.len() > 1 || self.active != Some(id);
        let keep = self.documents.swap_remove(index);
        self.documents.clear();
        self.documents.push(keep);
        self.active = Some(id);
        self.secondary_active = None;
        if matches!(self.pending_close, Some(PendingClose::Document(pending)) if pending != id) {
            self.pending_close = None;
        }
        Ok(changed)
    }

    pub fn close_all(&mut self) -> CloseOutcome {
        if self.has_dirty() {
            self.pending_close = Some(PendingClose::All);
            return CloseOutcome::NeedsConfirmation;
        }
        self.documents.clear();
        self.active = None;
        self.secondary_active = None;
        CloseOutcome::Closed
    }

    /// Discards unsaved changes for whatever the pending prompt was about and closes it.
    pub fn confirm_pending_close(&mut self) -> Vec<DocumentId> {
        match self.pending_close.take() {
            Some(PendingClose::Document(id)) => match self.index_of(id) {
                Some(index) => {
                    self.remove_at(index);
                    vec![id]
                }
                None => Vec::new(),
            },
            Some(PendingClose::All) => {
                let closed = self.documents.iter().map(|d| d.id).collect();
                self.documents.clear();
                self.active = None;
                self.secondary_active = None;
                closed
            }
            None => Vec::new(),
        }
    }

    pub fn cancel_pending_close(&mut self) -> bool {
        self.pending_close.take().is_some()
    }

    pub fn set_active(&mut self, id: DocumentId) -> Result<bool, SessionError> {
        if self.get(id).is_none() {
            return Err(SessionError::NotFound(id));
        }
        let changed = self.active != Some(id);
        self.active = Some(id);
        Ok(changed)
    }

    pub fn set_secondary_active(&mut self, id: Option<DocumentId>) -> Result<bool, SessionError> {
        if let Some(id) = id {
            if self.get(id).is_none() {
                return Err(SessionError::NotFound(id));
            }
        }
        let changed = self.secondary_active != id;
        self.secondary_active = id;
        Ok(changed)
    }

    pub fn set_split_mode(&mut self, mode: SplitMode) -> bool {
        let changed =
            self.split != mode || (mode == SplitMode::None && self.secondary_active.is_some());
        self.split = mode;
        if mode == SplitMode::None {
            self.secondary_active = None;
        }
        changed
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, SessionError> {
        let len = self.documents.len();
        if from >= len {
            return Err(SessionError::InvalidIndex { index: from, len });
        }
        if to >= len {
            return Err(SessionError::InvalidIndex { index: to, len });
        }
        if from == to {
            return Ok(false);
        }
        let doc = self.documents.remove(from);
        self.documents.insert(to, doc);
        Ok(true)
    }

    /// Follows a tree rename; id, content and dirty state are kept.
    pub fn reconcile_rename(&mut self, old_path: &str, new_path: &str) -> Option<DocumentId> {
        let doc = self.documents.iter_mut().find(|d| d.path == old_path)?;
        doc.set_path(new_path.to_string());
        Some(doc.id)
    }

    pub fn reconcile_delete(&mut self, path: &str) -> Option<DocumentId> {
        let index = self.documents.iter().position(|d| d.path == path)?;
        self.remove_at(index).map(|d| d.id)
    }
}
