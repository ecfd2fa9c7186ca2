use crate::kernel::editor::SessionState;
use crate::kernel::explorer::ExplorerState;
use crate::kernel::search::FindState;
use crate::kernel::services::ports::Settings;
use crate::models::FileTree;

#[derive(Debug)]
pub struct AppState {
    pub tree: FileTree,
    pub session: SessionState,
    pub explorer: ExplorerState,
    pub find: FindState,
    pub settings: Settings,
}

impl AppState {
    pub fn new(tree: FileTree, settings: Settings) -> Self {
        let explorer = ExplorerState::new(settings.explorer.initial_expanded.iter().cloned());
        Self {
            tree,
            session: SessionState::new(),
            explorer,
            find: FindState::default(),
            settings,
        }
    }
}
