use crate::kernel::Effect;

use super::action::EditorAction;
use super::state::{CloseOutcome, PendingClose, SessionError, SessionState};

impl SessionState {
    /// Pure session transitions. Persistence for `Save`/`SaveAll` is done by the store
    /// before the action reaches here.
    pub fn dispatch_action(
        &mut self,
        action: EditorAction,
    ) -> Result<(bool, Vec<Effect>), SessionError> {
        match action {
            EditorAction::UpdateContent { id, text } => {
                Ok((self.update_content(id, text)?, Vec::new()))
            }
            EditorAction::UpdateCursor { id, position } => {
                Ok((self.update_cursor(id, position)?, Vec::new()))
            }
            EditorAction::UpdateScroll { id, scroll_top } => {
                Ok((self.update_scroll(id, scroll_top)?, Vec::new()))
            }
            EditorAction::SetViewState { id, view_state } => {
                Ok((self.set_view_state(id, view_state)?, Vec::new()))
            }
            EditorAction::Save { id } => Ok((self.save(id)?, Vec::new())),
            EditorAction::SaveAll => Ok((self.save_all(), Vec::new())),
            EditorAction::Revert { id } => Ok((self.revert(id)?, Vec::new())),
            EditorAction::Close { id } => match self.close(id)? {
                CloseOutcome::Closed => Ok((true, vec![Effect::DocumentClosed(id)])),
                CloseOutcome::NeedsConfirmation => Ok((
                    true,
                    vec![Effect::PromptUnsaved(PendingClose::Document(id))],
                )),
            },
            EditorAction::ForceClose { id } => {
                self.force_close(id)?;
                Ok((true, vec![Effect::DocumentClosed(id)]))
            }
            EditorAction::CloseOthers { id } => {
                let closing: Vec<_> = self
                    .documents()
                    .iter()
                    .map(|d| d.id())
                    .filter(|other| *other != id)
                    .collect();
                let changed = self.close_others(id)?;
                Ok((changed, closing.into_iter().map(Effect::DocumentClosed).collect()))
            }
            EditorAction::CloseAll => {
                let closing: Vec<_> = self.documents().iter().map(|d| d.id()).collect();
                match self.close_all() {
                    CloseOutcome::Closed => Ok((
                        !closing.is_empty(),
                        closing.into_iter().map(Effect::DocumentClosed).collect(),
                    )),
                    CloseOutcome::NeedsConfirmation => {
                        Ok((true, vec![Effect::PromptUnsaved(PendingClose::All)]))
                    }
                }
            }
            EditorAction::ConfirmPendingClose => {
                let closed = self.confirm_pending_close();
                Ok((
                    !closed.is_empty(),
                    closed.into_iter().map(Effect::DocumentClosed).collect(),
                ))
            }
            EditorAction::CancelPendingClose => Ok((self.cancel_pending_close(), Vec::new())),
            EditorAction::SetActive { id } => Ok((self.set_active(id)?, Vec::new())),
            EditorAction::SetSecondaryActive { id } => {
                Ok((self.set_secondary_active(id)?, Vec::new()))
            }
            EditorAction::SetSplitMode { mode } => Ok((self.set_split_mode(mode), Vec::new())),
            EditorAction::ReorderTabs { from, to } => Ok((self.reorder(from, to)?, Vec::new())),
        }
    }
}
