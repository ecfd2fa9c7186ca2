use std::path::PathBuf;
use std::process::ExitCode;

use zstudio::kernel::services::adapters::{get_settings_path, load_settings, sample_workspace};
use zstudio::kernel::{Action, AppState, Store};
use zstudio::models::vpath;

mod logging;

fn main() -> ExitCode {
    let _logging = logging::init();

    let settings_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(get_settings_path);
    let settings = match settings_path.as_deref().map(load_settings) {
        Some(Ok(settings)) => settings,
        Some(Err(e)) => {
            eprintln!("zstudio: {}", e);
            tracing::error!(error = %e, "load settings failed");
            return ExitCode::FAILURE;
        }
        None => Default::default(),
    };

    let root = settings.explorer.root.clone();
    let (tree, content) = match sample_workspace(&root, settings.explorer.duplicate_policy()) {
        Ok(workspace) => workspace,
        Err(e) => {
            eprintln!("zstudio: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut store = Store::new(AppState::new(tree, settings), Box::new(content));

    let readme = vpath::join(&root, "README.md");
    if let Err(e) = store.dispatch(Action::OpenPath(readme)) {
        eprintln!("zstudio: {}", e);
    }

    let state = store.state();
    println!("{}", state.tree.root_path());
    for row in state.explorer.rows(&state.tree) {
        let marker = match (row.is_folder, row.is_expanded) {
            (true, true) => "v ",
            (true, false) => "> ",
            (false, _) => "  ",
        };
        println!(
            "{}{}{}",
            "  ".repeat(usize::from(row.depth) + 1),
            marker,
            row.name
        );
    }

    println!();
    for doc in state.session.documents() {
        let active = if state.session.active() == Some(doc.id()) {
            "*"
        } else {
            " "
        };
        let dirty = if doc.is_dirty() { " ●" } else { "" };
        println!(
            "{} {} [{}]{}",
            active,
            doc.title(),
            doc.language().display_name(),
            dirty
        );
    }

    ExitCode::SUCCESS
}
