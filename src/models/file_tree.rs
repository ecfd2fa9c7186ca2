//! 文件树数据模型
//!
//! Arena 存储（slotmap），路径由父链推导，因此 `path == parent.path + "/" + name`
//! 对每个非根节点天然成立；文件夹改名时后代路径随之改变。

use slotmap::{new_key_type, SlotMap};
use std::fmt;

use super::vpath;

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Folder,
}

impl NodeKind {
    fn rank(self) -> u8 {
        match self {
            NodeKind::Folder => 0,
            NodeKind::File => 1,
        }
    }
}

/// 同级重名策略。默认允许（与原有行为一致），`Reject` 时返回 `NameExists`。
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DuplicateNames {
    #[default]
    Allow,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTreeError {
    NotFound(String),
    NotAFolder(String),
    NameExists(String),
    InvalidName(String),
    RootNotRemovable,
}

impl fmt::Display for FileTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTreeError::NotFound(p) => write!(f, "not found: {}", p),
            FileTreeError::NotAFolder(p) => write!(f, "not a folder: {}", p),
            FileTreeError::NameExists(p) => write!(f, "name already exists: {}", p),
            FileTreeError::InvalidName(n) => write!(f, "invalid name: {:?}", n),
            FileTreeError::RootNotRemovable => write!(f, "the root folder cannot be deleted"),
        }
    }
}

impl std::error::Error for FileTreeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathEvent {
    Renamed { old_path: String, new_path: String },
    Deleted { path: String },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    name: String,
    parent: Option<NodeId>,
    children: Option<Vec<NodeId>>,
}

impl Node {
    fn new(kind: NodeKind, name: String, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            name,
            parent,
            children: match kind {
                NodeKind::File => None,
                NodeKind::Folder => Some(Vec::new()),
            },
        }
    }
}

/// Owned snapshot of a node, handed out by lookups and mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    pub extension: String,
}

impl NodeInfo {
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

#[derive(Debug, Clone)]
pub struct Renamed {
    pub node: NodeInfo,
    pub old_path: String,
    pub events: Vec<PathEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredNode {
    pub id: NodeId,
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    pub children: Vec<FilteredNode>,
}

#[derive(Debug, Clone)]
pub struct FilteredTree {
    pub root: FilteredNode,
    /// Folders the explorer should force open so every match is visible.
    pub expand: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FileTreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: String,
    pub path: String,
    pub is_folder: bool,
    pub is_expanded: bool,
}

pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
    root_prefix: String,
    duplicates: DuplicateNames,
}

impl fmt::Debug for FileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTree")
            .field("root", &self.root_path())
            .field("nodes", &self.arena.len())
            .field("duplicates", &self.duplicates)
            .finish()
    }
}

impl FileTree {
    pub fn new(root_path: &str) -> Self {
        Self::with_policy(root_path, DuplicateNames::default())
    }

    pub fn with_policy(root_path: &str, duplicates: DuplicateNames) -> Self {
        let root_path = root_path.trim_end_matches('/');
        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node::new(
            NodeKind::Folder,
            vpath::file_name(root_path).to_string(),
            None,
        ));

        Self {
            arena,
            root,
            root_prefix: vpath::parent_path(root_path).to_string(),
            duplicates,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_path(&self) -> String {
        self.full_path(self.root)
    }

    pub fn duplicates(&self) -> DuplicateNames {
        self.duplicates
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() <= 1
    }

    pub fn contains(&self, path: &str) -> bool {
        self.find_id(path).is_some()
    }

    fn full_path(&self, id: NodeId) -> String {
        let mut components = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.arena.get(node_id) else {
                break;
            };
            components.push(node.name.as_str());
            current = node.parent;
        }

        let mut path = self.root_prefix.clone();
        for comp in components.iter().rev() {
            // 只有根 `/` 的名字为空
            if comp.is_empty() {
                continue;
            }
            path.push('/');
            path.push_str(comp);
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }

    fn info(&self, id: NodeId) -> Option<NodeInfo> {
        let node = self.arena.get(id)?;
        let extension = match node.kind {
            NodeKind::File => vpath::extension(&node.name).to_string(),
            NodeKind::Folder => String::new(),
        };
        Some(NodeInfo {
            id,
            name: node.name.clone(),
            path: self.full_path(id),
            kind: node.kind,
            extension,
        })
    }

    fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.arena
            .get(parent)?
            .children
            .as_ref()?
            .iter()
            .copied()
            .find(|child| self.arena.get(*child).is_some_and(|n| n.name == name))
    }

    /// Resolves a path segment by segment. With duplicate siblings the first one in
    /// display order wins.
    pub fn find_id(&self, path: &str) -> Option<NodeId> {
        let path = path.trim_end_matches('/');
        let root_path = self.root_path();
        let root_path = root_path.trim_end_matches('/');
        if path == root_path {
            return Some(self.root);
        }

        let relative = path.strip_prefix(root_path)?.strip_prefix('/')?;
        let mut current = self.root;
        for segment in relative.split('/') {
            current = self.child_named(current, segment)?;
        }
        Some(current)
    }

    pub fn find(&self, path: &str) -> Option<NodeInfo> {
        self.find_id(path).and_then(|id| self.info(id))
    }

    pub fn node(&self, id: NodeId) -> Option<NodeInfo> {
        self.info(id)
    }

    pub fn children(&self, path: &str) -> Option<Vec<NodeInfo>> {
        let id = self.find_id(path)?;
        let children = self.arena.get(id)?.children.as_ref()?;
        Some(children.iter().filter_map(|c| self.info(*c)).collect())
    }

    /// Pre-order listing of every node, root first.
    pub fn walk(&self) -> Vec<NodeInfo> {
        self.subtree(self.root)
            .into_iter()
            .filter_map(|id| self.info(id))
            .collect()
    }

    pub fn folder_paths(&self) -> Vec<String> {
        self.subtree(self.root)
            .into_iter()
            .filter(|id| self.arena.get(*id).is_some_and(|n| n.kind == NodeKind::Folder))
            .map(|id| self.full_path(id))
            .collect()
    }

    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.arena.get(node_id) else {
                continue;
            };
            out.push(node_id);
            if let Some(children) = &node.children {
                stack.extend(children.iter().rev().copied());
            }
        }
        out
    }

    fn sort_children(&mut self, parent: NodeId) {
        let Some(mut children) = self.arena.get_mut(parent).and_then(|n| n.children.take()) else {
            return;
        };
        let arena = &self.arena;
        children.sort_by_cached_key(|id| {
            arena
                .get(*id)
                .map(|n| (n.kind.rank(), n.name.to_lowercase()))
        });
        if let Some(node) = self.arena.get_mut(parent) {
            node.children = Some(children);
        }
    }

    fn has_sibling_named(&self, parent: NodeId, name: &str, except: Option<NodeId>) -> bool {
        self.arena
            .get(parent)
            .and_then(|n| n.children.as_ref())
            .is_some_and(|children| {
                children.iter().any(|c| {
                    Some(*c) != except && self.arena.get(*c).is_some_and(|n| n.name == name)
                })
            })
    }

    pub fn create_node(
        &mut self,
        parent_path: &str,
        name: &str,
        kind: NodeKind,
    ) -> Result<NodeInfo, FileTreeError> {
        if !vpath::is_valid_name(name) {
            return Err(FileTreeError::InvalidName(name.to_string()));
        }

        let parent = self
            .find_id(parent_path)
            .ok_or_else(|| FileTreeError::NotFound(parent_path.to_string()))?;
        {
            let parent_ro = self
                .arena
                .get(parent)
                .ok_or_else(|| FileTreeError::NotFound(parent_path.to_string()))?;
            if parent_ro.children.is_none() {
                return Err(FileTreeError::NotAFolder(parent_path.to_string()));
            }
        }
        if self.duplicates == DuplicateNames::Reject && self.has_sibling_named(parent, name, None)
        {
            return Err(FileTreeError::NameExists(vpath::join(parent_path, name)));
        }

        let id = self
            .arena
            .insert(Node::new(kind, name.to_string(), Some(parent)));
        if let Some(children) = self.arena.get_mut(parent).and_then(|n| n.children.as_mut()) {
            children.push(id);
        }
        self.sort_children(parent);

        self.info(id)
            .ok_or_else(|| FileTreeError::NotFound(vpath::join(parent_path, name)))
    }

    pub fn rename_node(&mut self, path: &str, new_name: &str) -> Result<Renamed, FileTreeError> {
        if !vpath::is_valid_name(new_name) {
            return Err(FileTreeError::InvalidName(new_name.to_string()));
        }

        let id = self
            .find_id(path)
            .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
        let (parent, old_name) = {
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
            (node.parent, node.name.clone())
        };
        let old_path = self.full_path(id);

        if old_name == new_name {
            let node = self
                .info(id)
                .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
            return Ok(Renamed {
                node,
                old_path,
                events: Vec::new(),
            });
        }

        if let Some(parent_id) = parent {
            if self.duplicates == DuplicateNames::Reject
                && self.has_sibling_named(parent_id, new_name, Some(id))
            {
                let target = vpath::join(vpath::parent_path(&old_path), new_name);
                return Err(FileTreeError::NameExists(target));
            }
        }

        let before: Vec<String> = self
            .subtree(id)
            .into_iter()
            .map(|node_id| self.full_path(node_id))
            .collect();

        if let Some(node) = self.arena.get_mut(id) {
            node.name = new_name.to_string();
        }
        if let Some(parent_id) = parent {
            self.sort_children(parent_id);
        }

        let new_path = self.full_path(id);
        let events = before
            .into_iter()
            .filter_map(|old| {
                let new = vpath::rebase(&old, &old_path, &new_path)?;
                Some(PathEvent::Renamed {
                    old_path: old,
                    new_path: new,
                })
            })
            .collect();

        let node = self
            .info(id)
            .ok_or_else(|| FileTreeError::NotFound(new_path.clone()))?;
        Ok(Renamed {
            node,
            old_path,
            events,
        })
    }

    pub fn delete_node(&mut self, path: &str) -> Result<Vec<PathEvent>, FileTreeError> {
        let id = self
            .find_id(path)
            .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
        self.delete_id(id)
    }

    /// Deletes by id, so a node shadowed by a same-named sibling can still be removed.
    pub fn delete_id(&mut self, id: NodeId) -> Result<Vec<PathEvent>, FileTreeError> {
        if !self.arena.contains_key(id) {
            return Err(FileTreeError::NotFound(format!("{:?}", id)));
        }
        if id == self.root {
            return Err(FileTreeError::RootNotRemovable);
        }

        let parent = self.arena.get(id).and_then(|n| n.parent);
        let doomed = self.subtree(id);
        let events = doomed
            .iter()
            .map(|node_id| PathEvent::Deleted {
                path: self.full_path(*node_id),
            })
            .collect();

        if let Some(children) = parent
            .and_then(|p| self.arena.get_mut(p))
            .and_then(|n| n.children.as_mut())
        {
            children.retain(|c| *c != id);
        }
        for node_id in doomed {
            self.arena.remove(node_id);
        }

        Ok(events)
    }

    /// Pruned copy keeping files whose name contains `query` (case-insensitive), the
    /// folders leading to them, and folders whose own name matches.
    pub fn filter(&self, query: &str) -> Option<FilteredTree> {
        let needle = query.to_lowercase();
        let mut expand = Vec::new();
        let root = self.filter_node(self.root, &needle, &mut expand)?;
        Some(FilteredTree { root, expand })
    }

    fn filter_node(
        &self,
        id: NodeId,
        needle: &str,
        expand: &mut Vec<String>,
    ) -> Option<FilteredNode> {
        let node = self.arena.get(id)?;
        let name_matches = node.name.to_lowercase().contains(needle);

        match &node.children {
            None => name_matches.then(|| FilteredNode {
                id,
                name: node.name.clone(),
                path: self.full_path(id),
                kind: node.kind,
                children: Vec::new(),
            }),
            Some(children) => {
                let kept: Vec<FilteredNode> = children
                    .iter()
                    .filter_map(|c| self.filter_node(*c, needle, expand))
                    .collect();
                if kept.is_empty() && !name_matches {
                    return None;
                }
                let path = self.full_path(id);
                expand.push(path.clone());
                Some(FilteredNode {
                    id,
                    name: node.name.clone(),
                    path,
                    kind: node.kind,
                    children: kept,
                })
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        let mut seen = rustc_hash::FxHashSet::default();
        for id in self.subtree(self.root) {
            let node = self.arena.get(id).ok_or("dangling child id")?;
            let path = self.full_path(id);
            if let Some(parent) = node.parent {
                let parent_path = self.full_path(parent);
                if path != vpath::join(&parent_path, &node.name) {
                    return Err(format!("path mismatch at {}", path));
                }
                let linked = self
                    .arena
                    .get(parent)
                    .and_then(|p| p.children.as_ref())
                    .is_some_and(|c| c.contains(&id));
                if !linked {
                    return Err(format!("{} missing from parent", path));
                }
            } else if id != self.root {
                return Err(format!("second root at {}", path));
            }
            if let Some(children) = &node.children {
                let keys: Vec<_> = children
                    .iter()
                    .filter_map(|c| self.arena.get(*c))
                    .map(|n| (n.kind.rank(), n.name.to_lowercase()))
                    .collect();
                if keys.windows(2).any(|w| w[0] > w[1]) {
                    return Err(format!("children of {} out of order", path));
                }
            }
            if !seen.insert(path.clone()) && self.duplicates == DuplicateNames::Reject {
                return Err(format!("duplicate path {}", path));
            }
        }
        if seen.len() != self.arena.len() && self.duplicates == DuplicateNames::Reject {
            return Err("unreachable nodes in arena".to_string());
        }
        Ok(())
    }
}

impl FileTree {
    /// Rows of the visible tree. The root is always open and is not itself a row.
    pub fn flatten_for_view(&self, is_expanded: impl Fn(&str) -> bool) -> Vec<FileTreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = vec![(self.root, 0)];

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            let path = self.full_path(id);
            let expanded = id == self.root || is_expanded(&path);

            if id != self.root {
                result.push(FileTreeRow {
                    id,
                    depth,
                    name: node.name.clone(),
                    path,
                    is_folder: node.kind == NodeKind::Folder,
                    is_expanded: expanded && node.kind == NodeKind::Folder,
                });
            }

            if expanded {
                if let Some(children) = &node.children {
                    let child_depth = if id == self.root { depth } else { depth + 1 };
                    for child_id in children.iter().rev() {
                        stack.push((*child_id, child_depth));
                    }
                }
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
