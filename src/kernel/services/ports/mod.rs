//! Service ports: traits + data contracts.

pub mod content;
pub mod settings;

pub use content::{ContentError, ContentProvider, Result as ContentResult};
pub use settings::{AutoSave, EditorSettings, ExplorerSettings, Settings};
