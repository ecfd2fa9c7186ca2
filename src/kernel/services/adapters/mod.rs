//! Service adapters.

pub mod memory;
pub mod sample;
pub mod settings;

pub use memory::MemoryContentProvider;
pub use sample::{sample_workspace, SAMPLE_ROOT};
pub use settings::{ensure_log_dir, get_settings_path, load_settings, save_settings, SettingsError};
