use serde::{Deserialize, Serialize};

use crate::models::DuplicateNames;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub explorer: ExplorerSettings,
    #[serde(default)]
    pub editor: EditorSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerSettings {
    pub root: String,
    pub allow_duplicate_names: bool,
    pub initial_expanded: Vec<String>,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            root: "/my-website".to_string(),
            allow_duplicate_names: true,
            initial_expanded: vec!["/my-website".to_string(), "/my-website/src".to_string()],
        }
    }
}

impl ExplorerSettings {
    pub fn duplicate_policy(&self) -> DuplicateNames {
        if self.allow_duplicate_names {
            DuplicateNames::Allow
        } else {
            DuplicateNames::Reject
        }
    }
}

/// 自动保存策略；`AfterDelay` 由宿主上报的空闲时长驱动（`Action::AutoSave`）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutoSave {
    #[default]
    Off,
    AfterDelay,
    OnFocusChange,
}

/// Presentation-only editor options (theme, fonts, minimap) stay with the host and are
/// ignored when present in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub auto_save: AutoSave,
    pub auto_save_delay_ms: u64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            auto_save: AutoSave::Off,
            auto_save_delay_ms: 1000,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
