//! 数据模型层

pub mod file_tree;
pub mod vpath;

pub use file_tree::{
    DuplicateNames, FileTree, FileTreeError, FileTreeRow, FilteredNode, FilteredTree, NodeId,
    NodeInfo, NodeKind, PathEvent, Renamed,
};
