use super::*;
use crate::kernel::editor::{CloseOutcome, PendingClose, SplitMode};
use crate::kernel::services::adapters::{
    sample_workspace, MemoryContentProvider, SAMPLE_ROOT,
};
use crate::kernel::services::ports::{ContentResult, Settings};
use crate::models::{DuplicateNames, FileTree};

fn new_store() -> Store {
    let tree = FileTree::new("/proj");
    Store::new(
        AppState::new(tree, Settings::default()),
        Box::new(MemoryContentProvider::new()),
    )
}

fn sample_store() -> Store {
    let (tree, content) = sample_workspace(SAMPLE_ROOT, DuplicateNames::Allow).unwrap();
    Store::new(AppState::new(tree, Settings::default()), Box::new(content))
}

fn create(store: &mut Store, parent: &str, name: &str, kind: NodeKind, content: Option<&str>) {
    store
        .dispatch(Action::CreateNode {
            parent: parent.to_string(),
            name: name.to_string(),
            kind,
            content: content.map(str::to_string),
        })
        .unwrap();
}

fn open(store: &mut Store, path: &str) -> DocumentId {
    store
        .dispatch(Action::OpenPath(path.to_string()))
        .unwrap()
        .document
        .unwrap()
}

fn edit(store: &mut Store, id: DocumentId, text: &str) {
    store
        .dispatch(Action::Editor(EditorAction::UpdateContent {
            id,
            text: text.to_string(),
        }))
        .unwrap();
}

/// Accepts reads, refuses every write.
struct ReadOnlyProvider(MemoryContentProvider);

impl ContentProvider for ReadOnlyProvider {
    fn resolve(&self, path: &str) -> ContentResult<String> {
        self.0.resolve(path)
    }

    fn write(&mut self, path: &str, _content: &str) -> ContentResult<()> {
        Err(ContentError::Io(format!("read-only: {}", path)))
    }

    fn rename(&mut self, from: &str, to: &str) -> ContentResult<()> {
        self.0.rename(from, to)
    }

    fn remove(&mut self, path: &str) -> ContentResult<()> {
        self.0.remove(path)
    }
}

/// Accepts reads and writes, refuses to move or drop content.
struct PinnedProvider(MemoryContentProvider);

impl ContentProvider for PinnedProvider {
    fn resolve(&self, path: &str) -> ContentResult<String> {
        self.0.resolve(path)
    }

    fn write(&mut self, path: &str, content: &str) -> ContentResult<()> {
        self.0.write(path, content)
    }

    fn rename(&mut self, from: &str, _to: &str) -> ContentResult<()> {
        Err(ContentError::Io(format!("pinned: {}", from)))
    }

    fn remove(&mut self, path: &str) -> ContentResult<()> {
        Err(ContentError::Io(format!("pinned: {}", path)))
    }
}

fn store_with_auto_save(mode: AutoSave) -> Store {
    let mut settings = Settings::default();
    settings.editor.auto_save = mode;
    settings.editor.auto_save_delay_ms = 1000;
    Store::new(
        AppState::new(FileTree::new("/proj"), settings),
        Box::new(MemoryContentProvider::new()),
    )
}

#[test]
fn test_edit_close_force_close_keeps_node() {
    let mut store = new_store();
    create(&mut store, "/proj", "src", NodeKind::Folder, None);
    create(&mut store, "/proj/src", "a.ts", NodeKind::File, Some("x"));

    let id = open(&mut store, "/proj/src/a.ts");
    assert!(!store.state.session.get(id).unwrap().is_dirty());

    edit(&mut store, id, "y");
    assert!(store.state.session.get(id).unwrap().is_dirty());

    let result = store
        .dispatch(Action::Editor(EditorAction::Close { id }))
        .unwrap();
    assert_eq!(
        result.effects,
        vec![Effect::PromptUnsaved(PendingClose::Document(id))]
    );
    assert!(store.state.session.get(id).is_some());

    store
        .dispatch(Action::Editor(EditorAction::ForceClose { id }))
        .unwrap();
    assert!(store.state.session.get(id).is_none());
    assert!(store.state.tree.contains("/proj/src/a.ts"));
    assert_eq!(store.content().resolve("/proj/src/a.ts").unwrap(), "x");
}

#[test]
fn test_rename_folder_moves_open_document() {
    let mut store = new_store();
    create(&mut store, "/proj", "src", NodeKind::Folder, None);
    create(&mut store, "/proj/src", "a.ts", NodeKind::File, Some("x"));
    let id = open(&mut store, "/proj/src/a.ts");
    edit(&mut store, id, "y");

    let result = store
        .dispatch(Action::RenameNode {
            path: "/proj/src".to_string(),
            new_name: "lib".to_string(),
        })
        .unwrap();
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::PathsChanged(events)] if events.len() == 2
    ));

    let doc = store.state.session.get(id).unwrap();
    assert_eq!(doc.path(), "/proj/lib/a.ts");
    assert_eq!(doc.language().as_str(), "typescript");
    assert_eq!(doc.content(), "y");
    assert!(doc.is_dirty());
    assert!(store.state.explorer.is_expanded("/proj/lib"));
    assert!(!store.state.explorer.is_expanded("/proj/src"));
    assert_eq!(store.content().resolve("/proj/lib/a.ts").unwrap(), "x");
    store.state.tree.check_invariants().unwrap();
}

#[test]
fn test_rename_file_changes_language() {
    let mut store = new_store();
    create(&mut store, "/proj", "notes.txt", NodeKind::File, Some("# hi"));
    let id = open(&mut store, "/proj/notes.txt");
    assert_eq!(
        store.state.session.get(id).unwrap().language().as_str(),
        "plaintext"
    );

    store
        .dispatch(Action::RenameNode {
            path: "/proj/notes.txt".to_string(),
            new_name: "notes.md".to_string(),
        })
        .unwrap();
    let doc = store.state.session.get(id).unwrap();
    assert_eq!(doc.language().as_str(), "markdown");
    assert_eq!(doc.title(), "notes.md");
}

#[test]
fn test_filter_query_reveals_match_ancestors() {
    let mut store = new_store();
    create(&mut store, "/proj", "src", NodeKind::Folder, None);
    create(&mut store, "/proj/src", "a.ts", NodeKind::File, None);
    create(&mut store, "/proj", "readme.md", NodeKind::File, None);
    store.dispatch(Action::ExplorerCollapseAll).unwrap();

    let result = store
        .dispatch(Action::ExplorerSetFilterQuery {
            query: "a.ts".to_string(),
        })
        .unwrap();
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::RevealPaths(paths)] if paths.contains(&"/proj/src".to_string())
    ));
    assert!(store.state.explorer.is_expanded("/proj/src"));

    let rows: Vec<_> = store
        .state
        .explorer
        .rows(&store.state.tree)
        .into_iter()
        .map(|r| r.path)
        .collect();
    assert_eq!(rows, vec!["/proj/src", "/proj/src/a.ts"]);
}

#[test]
fn test_delete_folder_closes_descendant_documents() {
    let mut store = new_store();
    create(&mut store, "/proj", "src", NodeKind::Folder, None);
    create(&mut store, "/proj/src", "a.ts", NodeKind::File, Some("a"));
    create(&mut store, "/proj/src", "b.css", NodeKind::File, Some("b"));
    create(&mut store, "/proj", "keep.md", NodeKind::File, Some("k"));

    let a = open(&mut store, "/proj/src/a.ts");
    let b = open(&mut store, "/proj/src/b.css");
    let keep = open(&mut store, "/proj/keep.md");
    edit(&mut store, a, "dirty");

    let result = store
        .dispatch(Action::DeleteNode {
            path: "/proj/src".to_string(),
        })
        .unwrap();

    assert!(result.effects.contains(&Effect::DocumentClosed(a)));
    assert!(result.effects.contains(&Effect::DocumentClosed(b)));
    assert!(store.state.session.get(a).is_none());
    assert!(store.state.session.get(b).is_none());
    assert_eq!(store.state.session.active(), Some(keep));
    assert!(!store.state.tree.contains("/proj/src"));
    assert!(!store.state.tree.contains("/proj/src/a.ts"));
    assert!(store.content().resolve("/proj/src/a.ts").is_err());

    let err = store
        .dispatch(Action::DeleteNode {
            path: "/proj/src".to_string(),
        })
        .unwrap_err();
    assert_eq!(
        err,
        KernelError::Tree(FileTreeError::NotFound("/proj/src".to_string()))
    );
}

#[test]
fn test_create_expands_and_selects() {
    let mut store = new_store();
    create(&mut store, "/proj", "src", NodeKind::Folder, None);
    create(&mut store, "/proj/src", "new.ts", NodeKind::File, None);

    assert!(store.state.explorer.is_expanded("/proj/src"));
    assert_eq!(store.state.explorer.selected(), Some("/proj/src/new.ts"));
    let id = open(&mut store, "/proj/src/new.ts");
    assert_eq!(store.state.session.get(id).unwrap().content(), "");
}

#[test]
fn test_create_under_missing_parent_is_rejected() {
    let mut store = new_store();
    let err = store
        .dispatch(Action::CreateNode {
            parent: "/proj/nope".to_string(),
            name: "a.ts".to_string(),
            kind: NodeKind::File,
            content: None,
        })
        .unwrap_err();
    assert_eq!(
        err,
        KernelError::Tree(FileTreeError::NotFound("/proj/nope".to_string()))
    );
    assert_eq!(store.state.tree.len(), 1);
}

#[test]
fn test_save_writes_through_provider() {
    let mut store = sample_store();
    let path = format!("{}/README.md", SAMPLE_ROOT);
    let id = open(&mut store, &path);
    edit(&mut store, id, "# changed");

    let result = store
        .dispatch(Action::Editor(EditorAction::Save { id }))
        .unwrap();
    assert!(result.state_changed);
    assert!(!store.state.session.get(id).unwrap().is_dirty());
    assert_eq!(store.content().resolve(&path).unwrap(), "# changed");
}

#[test]
fn test_save_failure_leaves_document_dirty() {
    let mut content = MemoryContentProvider::new();
    content.insert("/proj/a.ts", "x");
    let mut tree = FileTree::new("/proj");
    tree.create_node("/proj", "a.ts", NodeKind::File).unwrap();
    let mut store = Store::new(
        AppState::new(tree, Settings::default()),
        Box::new(ReadOnlyProvider(content)),
    );

    let id = open(&mut store, "/proj/a.ts");
    edit(&mut store, id, "y");

    let err = store
        .dispatch(Action::Editor(EditorAction::Save { id }))
        .unwrap_err();
    assert!(matches!(err, KernelError::Content(ContentError::Io(_))));
    assert!(store.state.session.get(id).unwrap().is_dirty());

    assert!(store
        .dispatch(Action::Editor(EditorAction::SaveAll))
        .is_err());
    assert!(store.state.session.has_dirty());
}

#[test]
fn test_save_all_writes_every_dirty_document() {
    let mut store = sample_store();
    let readme = format!("{}/README.md", SAMPLE_ROOT);
    let index = format!("{}/index.html", SAMPLE_ROOT);
    let a = open(&mut store, &readme);
    let b = open(&mut store, &index);
    edit(&mut store, a, "one");
    edit(&mut store, b, "two");

    let result = store
        .dispatch(Action::Editor(EditorAction::SaveAll))
        .unwrap();
    assert!(result.state_changed);
    assert!(!store.state.session.has_dirty());
    assert_eq!(store.content().resolve(&readme).unwrap(), "one");
    assert_eq!(store.content().resolve(&index).unwrap(), "two");
}

#[test]
fn test_open_binary_file_is_refused() {
    let mut store = sample_store();
    let err = store
        .dispatch(Action::OpenPath(format!(
            "{}/public/images/hero.png",
            SAMPLE_ROOT
        )))
        .unwrap_err();
    assert!(matches!(
        err,
        KernelError::Session(SessionError::Content(ContentError::Binary(_)))
    ));
    assert!(store.state.session.is_empty());
}

#[test]
fn test_open_folder_toggles_expansion() {
    let mut store = sample_store();
    let public = format!("{}/public", SAMPLE_ROOT);
    assert!(!store.state.explorer.is_expanded(&public));

    let result = store.dispatch(Action::OpenPath(public.clone())).unwrap();
    assert!(result.document.is_none());
    assert!(store.state.explorer.is_expanded(&public));
}

#[test]
fn test_open_twice_reuses_document() {
    let mut store = sample_store();
    let path = format!("{}/package.json", SAMPLE_ROOT);
    let first = open(&mut store, &path);
    let second = open(&mut store, &path);
    assert_eq!(first, second);
    assert_eq!(store.state.session.len(), 1);
}

#[test]
fn test_close_all_prompt_then_confirm() {
    let mut store = sample_store();
    let a = open(&mut store, &format!("{}/README.md", SAMPLE_ROOT));
    open(&mut store, &format!("{}/index.html", SAMPLE_ROOT));
    edit(&mut store, a, "dirty");

    let result = store
        .dispatch(Action::Editor(EditorAction::CloseAll))
        .unwrap();
    assert_eq!(result.effects, vec![Effect::PromptUnsaved(PendingClose::All)]);
    assert_eq!(store.state.session.len(), 2);

    let result = store
        .dispatch(Action::Editor(EditorAction::ConfirmPendingClose))
        .unwrap();
    assert_eq!(result.effects.len(), 2);
    assert!(store.state.session.is_empty());
    assert_eq!(store.state.session.close_all(), CloseOutcome::Closed);
}

#[test]
fn test_unknown_document_is_reported() {
    let mut store = new_store();
    let ghost = DocumentId::new(42);
    let err = store
        .dispatch(Action::Editor(EditorAction::SetActive { id: ghost }))
        .unwrap_err();
    assert_eq!(err, KernelError::Session(SessionError::NotFound(ghost)));
}

#[test]
fn test_split_mode_none_clears_secondary() {
    let mut store = sample_store();
    let a = open(&mut store, &format!("{}/README.md", SAMPLE_ROOT));
    store
        .dispatch(Action::Editor(EditorAction::SetSplitMode {
            mode: SplitMode::Horizontal,
        }))
        .unwrap();
    store
        .dispatch(Action::Editor(EditorAction::SetSecondaryActive { id: Some(a) }))
        .unwrap();
    store
        .dispatch(Action::Editor(EditorAction::SetSplitMode {
            mode: SplitMode::None,
        }))
        .unwrap();
    assert_eq!(store.state.session.secondary_active(), None);
}

#[test]
fn test_find_follows_active_document() {
    let mut store = sample_store();
    let id = open(&mut store, &format!("{}/README.md", SAMPLE_ROOT));
    edit(&mut store, id, "alpha beta\nalpha");

    store
        .dispatch(Action::FindSetQuery {
            query: "alpha".to_string(),
        })
        .unwrap();
    assert_eq!(store.state.find.matches.len(), 2);

    store.dispatch(Action::FindNext).unwrap();
    assert_eq!(store.state.find.current, Some(1));

    edit(&mut store, id, "beta");
    assert!(store.state.find.matches.is_empty());
    assert_eq!(store.state.find.current, None);
}

#[test]
fn test_create_with_failed_write_leaves_no_node() {
    let mut tree = FileTree::new("/proj");
    tree.create_node("/proj", "src", NodeKind::Folder).unwrap();
    tree.create_node("/proj/src", "a.ts", NodeKind::File).unwrap();
    let mut store = Store::new(
        AppState::new(tree, Settings::default()),
        Box::new(ReadOnlyProvider(MemoryContentProvider::new())),
    );

    for name in ["b.ts", "a.ts"] {
        let err = store
            .dispatch(Action::CreateNode {
                parent: "/proj/src".to_string(),
                name: name.to_string(),
                kind: NodeKind::File,
                content: Some("x".to_string()),
            })
            .unwrap_err();
        assert!(matches!(err, KernelError::Content(ContentError::Io(_))));
    }

    assert!(!store.state.tree.contains("/proj/src/b.ts"));
    assert_eq!(store.state.tree.children("/proj/src").unwrap().len(), 1);
    assert_eq!(store.state.tree.len(), 3);
    assert!(!store.state.explorer.is_expanded("/proj/src"));
    assert_eq!(store.state.explorer.selected(), None);
    store.state.tree.check_invariants().unwrap();

    // Folders never touch the provider.
    create(&mut store, "/proj", "lib", NodeKind::Folder, None);
    assert!(store.state.tree.contains("/proj/lib"));
}

#[test]
fn test_rename_and_delete_commit_when_provider_lags() {
    let mut content = MemoryContentProvider::new();
    content.insert("/proj/src/a.ts", "a");
    let mut tree = FileTree::new("/proj");
    tree.create_node("/proj", "src", NodeKind::Folder).unwrap();
    tree.create_node("/proj/src", "a.ts", NodeKind::File).unwrap();
    let mut store = Store::new(
        AppState::new(tree, Settings::default()),
        Box::new(PinnedProvider(content)),
    );
    let id = open(&mut store, "/proj/src/a.ts");

    let result = store
        .dispatch(Action::RenameNode {
            path: "/proj/src".to_string(),
            new_name: "lib".to_string(),
        })
        .unwrap();
    assert!(result.state_changed);
    assert!(store.state.tree.contains("/proj/lib/a.ts"));
    assert_eq!(store.state.session.get(id).unwrap().path(), "/proj/lib/a.ts");

    let result = store
        .dispatch(Action::DeleteNode {
            path: "/proj/lib".to_string(),
        })
        .unwrap();
    assert!(result.effects.contains(&Effect::DocumentClosed(id)));
    assert!(!store.state.tree.contains("/proj/lib"));
    assert!(store.state.session.get(id).is_none());
}

#[test]
fn test_delete_with_trailing_slash_drops_content() {
    let mut store = new_store();
    create(&mut store, "/proj", "src", NodeKind::Folder, None);
    create(&mut store, "/proj/src", "a.ts", NodeKind::File, Some("a"));
    create(&mut store, "/proj", "srcx.ts", NodeKind::File, Some("s"));

    store
        .dispatch(Action::DeleteNode {
            path: "/proj/src/".to_string(),
        })
        .unwrap();

    assert!(!store.state.tree.contains("/proj/src"));
    assert!(store.content().resolve("/proj/src/a.ts").is_err());
    assert_eq!(store.content().resolve("/proj/srcx.ts").unwrap(), "s");
}

#[test]
fn test_replace_current_then_all_marks_dirty() {
    let mut store = new_store();
    create(&mut store, "/proj", "a.ts", NodeKind::File, Some("foo bar foo\nfoo"));
    let id = open(&mut store, "/proj/a.ts");

    store
        .dispatch(Action::FindSetQuery {
            query: "foo".to_string(),
        })
        .unwrap();
    store
        .dispatch(Action::FindSetReplace {
            text: "baz".to_string(),
        })
        .unwrap();
    assert!(store.state.find.history().is_empty());

    let result = store.dispatch(Action::FindReplaceCurrent).unwrap();
    assert_eq!(result.document, Some(id));
    let doc = store.state.session.get(id).unwrap();
    assert_eq!(doc.content(), "baz bar foo\nfoo");
    assert!(doc.is_dirty());
    assert_eq!(store.state.find.matches.len(), 2);
    assert_eq!(store.state.find.current, Some(0));
    assert_eq!(store.state.find.history(), ["foo".to_string()]);
    assert_eq!(store.state.find.replace_history(), ["baz".to_string()]);

    store.dispatch(Action::FindReplaceAll).unwrap();
    assert_eq!(
        store.state.session.get(id).unwrap().content(),
        "baz bar baz\nbaz"
    );
    assert!(store.state.find.matches.is_empty());

    let result = store.dispatch(Action::FindReplaceAll).unwrap();
    assert!(!result.state_changed);
}

#[test]
fn test_replace_without_active_document_is_noop() {
    let mut store = new_store();
    store
        .dispatch(Action::FindSetQuery {
            query: "foo".to_string(),
        })
        .unwrap();
    let result = store.dispatch(Action::FindReplaceAll).unwrap();
    assert!(!result.state_changed);
    assert_eq!(result.document, None);
}

#[test]
fn test_navigation_commits_query_to_history() {
    let mut store = sample_store();
    open(&mut store, &format!("{}/README.md", SAMPLE_ROOT));
    for query in ["W", "We", "Web"] {
        store
            .dispatch(Action::FindSetQuery {
                query: query.to_string(),
            })
            .unwrap();
    }
    assert!(store.state.find.history().is_empty());

    store.dispatch(Action::FindNext).unwrap();
    assert_eq!(store.state.find.history(), ["Web".to_string()]);
}

#[test]
fn test_focus_change_saves_previous_document() {
    let mut store = store_with_auto_save(AutoSave::OnFocusChange);
    create(&mut store, "/proj", "a.ts", NodeKind::File, Some("a"));
    create(&mut store, "/proj", "b.ts", NodeKind::File, Some("b"));

    let a = open(&mut store, "/proj/a.ts");
    edit(&mut store, a, "a2");
    let b = open(&mut store, "/proj/b.ts");
    assert!(!store.state.session.get(a).unwrap().is_dirty());
    assert_eq!(store.content().resolve("/proj/a.ts").unwrap(), "a2");

    edit(&mut store, b, "b2");
    let result = store
        .dispatch(Action::Editor(EditorAction::SetActive { id: a }))
        .unwrap();
    assert!(result.state_changed);
    assert!(!store.state.session.get(b).unwrap().is_dirty());
    assert_eq!(store.content().resolve("/proj/b.ts").unwrap(), "b2");
}

#[test]
fn test_focus_change_without_auto_save_keeps_dirty() {
    let mut store = store_with_auto_save(AutoSave::Off);
    create(&mut store, "/proj", "a.ts", NodeKind::File, Some("a"));
    create(&mut store, "/proj", "b.ts", NodeKind::File, Some("b"));

    let a = open(&mut store, "/proj/a.ts");
    edit(&mut store, a, "a2");
    let b = open(&mut store, "/proj/b.ts");
    store
        .dispatch(Action::Editor(EditorAction::SetActive { id: a }))
        .unwrap();
    store
        .dispatch(Action::Editor(EditorAction::SetActive { id: b }))
        .unwrap();

    assert!(store.state.session.get(a).unwrap().is_dirty());
    assert_eq!(store.content().resolve("/proj/a.ts").unwrap(), "a");
}

#[test]
fn test_auto_save_after_delay() {
    let mut store = store_with_auto_save(AutoSave::AfterDelay);
    create(&mut store, "/proj", "a.ts", NodeKind::File, Some("a"));
    let a = open(&mut store, "/proj/a.ts");
    edit(&mut store, a, "a2");

    let result = store.dispatch(Action::AutoSave { idle_ms: 500 }).unwrap();
    assert!(!result.state_changed);
    assert!(store.state.session.get(a).unwrap().is_dirty());

    let result = store.dispatch(Action::AutoSave { idle_ms: 1000 }).unwrap();
    assert!(result.state_changed);
    assert!(!store.state.session.get(a).unwrap().is_dirty());
    assert_eq!(store.content().resolve("/proj/a.ts").unwrap(), "a2");
}
