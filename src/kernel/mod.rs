//! Headless application core (state/action/effect).

pub mod action;
pub mod editor;
pub mod effect;
pub mod explorer;
pub mod language;
pub mod search;
pub mod services;
pub mod state;
pub mod store;

pub use action::Action;
pub use editor::{EditorAction, SessionState};
pub use effect::Effect;
pub use explorer::ExplorerState;
pub use language::LanguageId;
pub use search::{find_matches, replace_matches, FindMatch, FindOptions, FindState, ReplaceTarget};
pub use state::AppState;
pub use store::{DispatchResult, KernelError, Store};
