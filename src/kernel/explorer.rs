//! 资源管理器视图状态：展开集合、选中项、过滤关键字。

use rustc_hash::FxHashSet;

use crate::models::{vpath, FileTree, FileTreeRow, FilteredNode, NodeId, PathEvent};

#[derive(Debug, Clone, Default)]
pub struct ExplorerState {
    expanded: FxHashSet<String>,
    selected: Option<String>,
    query: String,
}

impl ExplorerState {
    pub fn new<I, S>(initial_expanded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expanded: initial_expanded.into_iter().map(Into::into).collect(),
            selected: None,
            query: String::new(),
        }
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn expanded_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.expanded.iter().cloned().collect();
        paths.sort();
        paths
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn select(&mut self, path: Option<String>) -> bool {
        if self.selected == path {
            return false;
        }
        self.selected = path;
        true
    }

    pub fn toggle(&mut self, path: &str) -> bool {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
        true
    }

    pub fn expand(&mut self, path: &str) -> bool {
        self.expanded.insert(path.to_string())
    }

    pub fn collapse(&mut self, path: &str) -> bool {
        self.expanded.remove(path)
    }

    pub fn expand_all(&mut self, tree: &FileTree) -> bool {
        let before = self.expanded.len();
        self.expanded.extend(tree.folder_paths());
        self.expanded.len() != before
    }

    pub fn collapse_all(&mut self) -> bool {
        let changed = !self.expanded.is_empty();
        self.expanded.clear();
        changed
    }

    pub fn set_query(&mut self, query: String) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query;
        true
    }

    /// Opens every folder in `paths`; used to keep filter matches visible.
    pub fn reveal<I>(&mut self, paths: I) -> bool
    where
        I: IntoIterator<Item = String>,
    {
        let mut changed = false;
        for path in paths {
            changed |= self.expanded.insert(path);
        }
        changed
    }

    pub fn apply(&mut self, event: &PathEvent) {
        match event {
            PathEvent::Renamed { old_path, new_path } => {
                if self.expanded.remove(old_path.as_str()) {
                    self.expanded.insert(new_path.clone());
                }
                if self.selected.as_deref() == Some(old_path.as_str()) {
                    self.selected = Some(new_path.clone());
                }
            }
            PathEvent::Deleted { path } => {
                self.expanded
                    .retain(|p| !vpath::is_same_or_descendant(p, path));
                if self
                    .selected
                    .as_deref()
                    .is_some_and(|s| vpath::is_same_or_descendant(s, path))
                {
                    self.selected = None;
                }
            }
        }
    }

    /// Visible rows. A non-empty query shows the pruned tree with every match forced open.
    pub fn rows(&self, tree: &FileTree) -> Vec<FileTreeRow> {
        if self.query.trim().is_empty() {
            return tree.flatten_for_view(|p| self.expanded.contains(p));
        }
        let Some(filtered) = tree.filter(self.query.trim()) else {
            return Vec::new();
        };
        let forced: FxHashSet<&str> = filtered.expand.iter().map(String::as_str).collect();
        let mut visible = FxHashSet::default();
        collect_ids(&filtered.root, &mut visible);
        tree.flatten_for_view(|p| forced.contains(p) || self.expanded.contains(p))
            .into_iter()
            .filter(|row| visible.contains(&row.id))
            .collect()
    }
}

fn collect_ids(node: &FilteredNode, out: &mut FxHashSet<NodeId>) {
    out.insert(node.id);
    for child in &node.children {
        collect_ids(child, out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/explorer.rs"]
mod tests;
